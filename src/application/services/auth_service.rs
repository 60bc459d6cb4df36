//! Session establishment and teardown.

use std::sync::Arc;

use super::api_client::ApiClient;
use crate::api::dto::auth::{
    CredentialsRequest, LoginResponse, LogoutRequest, RegisterResponse, UserResponse,
};
use crate::domain::entities::{CredentialPair, User};
use crate::domain::repositories::HttpMethod;
use crate::domain::session_event::SessionEvent;
use crate::error::AppError;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const USER_PATH: &str = "/auth/user";

/// Service for logging in, registering and logging out.
///
/// Login stores the issued [`CredentialPair`] and re-arms the credential
/// refresher; logout is best-effort towards the server but always drops the
/// local session.
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Authenticates with email and password and stores the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthRejected`] for wrong credentials,
    /// [`AppError::Validation`] for malformed input, and
    /// [`AppError::Storage`] if the credentials cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<CredentialPair, AppError> {
        let body = serde_json::to_value(CredentialsRequest { email, password })?;
        let response: LoginResponse = self
            .client
            .request_public(HttpMethod::Post, LOGIN_PATH, Some(body))
            .await?;

        let pair = CredentialPair::from(response);
        self.client.store().set(pair.clone())?;

        let refresher = self.client.refresher();
        refresher.reset();
        refresher.notify(SessionEvent::Established);

        tracing::info!("Logged in");
        Ok(pair)
    }

    /// Creates an account. The new user still has to log in.
    ///
    /// Returns the server-assigned user id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the email is taken or invalid.
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse, AppError> {
        let body = serde_json::to_value(CredentialsRequest { email, password })?;
        let response: RegisterResponse = self
            .client
            .request_public(HttpMethod::Post, REGISTER_PATH, Some(body))
            .await?;

        tracing::info!(user_id = %response.user_id, "Registered");
        Ok(response)
    }

    /// Revokes the refresh token on the server and drops local credentials.
    ///
    /// Server-side failures are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if local credentials cannot be removed.
    pub async fn logout(&self) -> Result<(), AppError> {
        let store = self.client.store();

        if let Some(refresh_token) = store.refresh_token() {
            let body = serde_json::to_value(LogoutRequest {
                refresh_token: &refresh_token,
            })?;
            if let Err(e) = self
                .client
                .send_public(HttpMethod::Post, LOGOUT_PATH, Some(body))
                .await
            {
                tracing::warn!("Server-side logout failed: {e}");
            }
        }

        store.clear()?;
        self.client.refresher().notify(SessionEvent::LoggedOut);

        tracing::info!("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.store().is_authenticated()
    }

    /// Fetches the profile of the logged-in user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn current_user(&self) -> Result<User, AppError> {
        let response: UserResponse = self.client.request(HttpMethod::Get, USER_PATH, None).await?;
        Ok(response.user.into())
    }
}
