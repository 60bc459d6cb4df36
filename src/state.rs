//! Wiring of the client services.

use std::sync::Arc;

use crate::application::services::{
    ApiClient, AuthService, CredentialRefresher, DashboardService, TokenStore, UrlService,
};
use crate::config::Config;
use crate::domain::repositories::{CredentialStorage, HttpTransport};
use crate::error::AppError;
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::storage::FileStorage;
use crate::utils::short_url::normalize_base_url;

/// Shared handles to every service, built once at startup.
///
/// All services share one [`TokenStore`] and one [`CredentialRefresher`], so
/// concurrent requests funnel through a single refresh cycle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TokenStore>,
    pub refresher: Arc<CredentialRefresher>,
    pub client: Arc<ApiClient>,
    pub auth: Arc<AuthService>,
    pub urls: Arc<UrlService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    /// Builds the production stack: `reqwest` transport and file storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a base URL is invalid or the session file cannot
    /// be read.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(
            &config.api_base_url,
            config.request_timeout(),
            config.connect_timeout(),
        )?;
        let storage = FileStorage::new(&config.token_store_path);

        Self::with_parts(
            Arc::new(transport),
            Arc::new(storage),
            &config.short_link_base_url,
        )
    }

    /// Builds the stack over arbitrary transport and storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid short link base and
    /// [`AppError::Storage`] if persisted credentials cannot be read.
    pub fn with_parts(
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn CredentialStorage>,
        short_link_base: &str,
    ) -> Result<Self, AppError> {
        let short_link_base = normalize_base_url(short_link_base).map_err(|e| {
            AppError::validation(
                400,
                format!("Invalid short link base URL: {e}"),
                serde_json::json!({ "short_link_base": short_link_base }),
            )
        })?;

        let store = Arc::new(TokenStore::open(storage)?);
        let refresher = Arc::new(CredentialRefresher::new(transport.clone(), store.clone()));
        let client = Arc::new(ApiClient::new(transport, store.clone(), refresher.clone()));

        let auth = Arc::new(AuthService::new(client.clone()));
        let urls = Arc::new(UrlService::new(client.clone(), short_link_base));
        let dashboard = Arc::new(DashboardService::new(urls.clone()));

        Ok(Self {
            store,
            refresher,
            client,
            auth,
            urls,
            dashboard,
        })
    }
}
