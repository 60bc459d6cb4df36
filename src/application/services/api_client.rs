//! Authenticated request pipeline with refresh-and-retry.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::credential_refresher::CredentialRefresher;
use super::token_store::TokenStore;
use crate::domain::repositories::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
use crate::error::AppError;

const NOT_LOGGED_IN: &str = "Not logged in";
const REJECTED_AFTER_REFRESH: &str = "Access token rejected after refresh";

/// Sends requests to the remote service on behalf of the session.
///
/// Authenticated requests follow a two-step protocol:
///
/// 1. Send with the current access token.
/// 2. On a 401, obtain a renewed token from the [`CredentialRefresher`] and
///    resend exactly once.
///
/// A 401 on the resend terminates the session. Every other failure is
/// surfaced unchanged, without retry.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<TokenStore>,
    refresher: Arc<CredentialRefresher>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<TokenStore>,
        refresher: Arc<CredentialRefresher>,
    ) -> Self {
        Self {
            transport,
            store,
            refresher,
        }
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    pub fn refresher(&self) -> &Arc<CredentialRefresher> {
        &self.refresher
    }

    /// Sends an authenticated request.
    ///
    /// # Errors
    ///
    /// - [`AppError::AuthRejected`] if there is no session, the refresh
    ///   failed, or the renewed token was rejected as well
    /// - [`AppError::Network`] if no response arrived
    /// - [`AppError::Validation`] / [`AppError::Server`] for other failures
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, AppError> {
        let Some(stale) = self.store.access_token() else {
            return Err(AppError::auth_rejected(NOT_LOGGED_IN));
        };

        match self
            .attempt(method, path, body.clone(), Some(stale.clone()))
            .await
        {
            Err(AppError::AuthExpired) => {}
            other => return other,
        }

        tracing::debug!(%method, path, "Access token expired, refreshing");
        let fresh = self.refresher.refresh(&stale).await?;

        match self.attempt(method, path, body, Some(fresh)).await {
            Err(AppError::AuthExpired) => {
                self.refresher.invalidate(REJECTED_AFTER_REFRESH);
                Err(AppError::auth_rejected(REJECTED_AFTER_REFRESH))
            }
            other => other,
        }
    }

    /// Sends an authenticated request and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::send`]; additionally [`AppError::Decode`] when the body
    /// does not match `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, AppError> {
        let response = self.send(method, path, body).await?;
        decode(response)
    }

    /// Sends a request without credentials.
    ///
    /// Used for login, registration and logout. A 401 here is final and
    /// carries the server's message.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::send`], without the refresh step.
    pub async fn send_public(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, AppError> {
        let response = self
            .transport
            .send(ApiRequest::new(method, path, body))
            .await?;

        if response.status == 401 {
            let message = response
                .body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unauthorized");
            return Err(AppError::auth_rejected(message));
        }

        classify(response)
    }

    /// Unauthenticated counterpart of [`Self::request`].
    ///
    /// # Errors
    ///
    /// See [`Self::send_public`]; additionally [`AppError::Decode`].
    pub async fn request_public<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, AppError> {
        let response = self.send_public(method, path, body).await?;
        decode(response)
    }

    async fn attempt(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        bearer: Option<String>,
    ) -> Result<ApiResponse, AppError> {
        let request = ApiRequest::new(method, path, body).with_bearer(bearer);
        let response = self.transport.send(request).await?;
        classify(response)
    }
}

fn classify(response: ApiResponse) -> Result<ApiResponse, AppError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(AppError::from_status(response.status, response.body))
    }
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T, AppError> {
    serde_json::from_value(response.body).map_err(AppError::from)
}
