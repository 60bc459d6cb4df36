//! DTOs for the authentication endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{CredentialPair, User};

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(alias = "refreshToken")]
    pub refresh_token: String,
    #[serde(default, alias = "expiresIn")]
    pub expires_in: Option<u64>,
    #[serde(default, alias = "tokenType")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<LoginResponse> for CredentialPair {
    fn from(response: LoginResponse) -> Self {
        CredentialPair::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
        )
    }
}

/// Successful registration.
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    #[serde(
        alias = "userId",
        deserialize_with = "super::flexible_id::deserialize"
    )]
    pub user_id: String,
}

/// Body of `POST /refresh-token`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Successful refresh exchange.
///
/// The service may rotate the refresh token; when it does not, the previous
/// one stays valid.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(default, alias = "expiresIn")]
    pub expires_in: Option<u64>,
}

/// Body of `POST /auth/logout`.
#[derive(Debug, Serialize)]
pub struct LogoutRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response of `GET /auth/user`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub user: UserPayload,
}

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    #[serde(deserialize_with = "super::flexible_id::deserialize")]
    pub id: String,
    pub email: String,
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        User {
            id: payload.id,
            email: payload.email,
        }
    }
}
