//! Wire transport used by the API client.

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP methods used by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A single outbound request.
///
/// `path` is relative to the service base URL. `bearer` is attached as an
/// `Authorization: Bearer` header when present.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, bearer: Option<String>) -> Self {
        self.bearer = bearer;
        self
    }
}

/// A received response, before status classification.
///
/// `body` is the decoded JSON payload, `Value::Null` for an empty body, or a
/// JSON string holding the raw text when the payload is not JSON.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the remote service.
///
/// Implementations only move bytes: they return `Ok` for every response that
/// arrived, whatever its status, and `Err` only when no response was received.
/// Status classification and the refresh-and-retry policy live in
/// [`crate::application::services::ApiClient`].
///
/// # Implementations
///
/// - [`crate::infrastructure::http::ReqwestTransport`] - `reqwest` over HTTP(S)
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Network`] on connection failures and timeouts.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;
}
