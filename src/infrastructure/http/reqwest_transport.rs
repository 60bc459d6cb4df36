//! `reqwest`-backed implementation of [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::debug;

use crate::domain::repositories::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
use crate::error::AppError;
use crate::utils::short_url::normalize_base_url;

const USER_AGENT: &str = concat!("shortener-dashboard/", env!("CARGO_PKG_VERSION"));

/// Sends JSON requests to the remote service over HTTP(S).
///
/// Every request carries the configured deadline; a timed-out request is
/// reported as [`AppError::Network`] like any other transport failure.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Builds a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unusable base URL and
    /// [`AppError::Network`] if the TLS backend cannot be initialised.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, AppError> {
        let base_url = normalize_base_url(base_url).map_err(|e| {
            AppError::validation(
                400,
                format!("Invalid API base URL: {e}"),
                serde_json::json!({ "base_url": base_url }),
            )
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> Result<Url, AppError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| AppError::network(format!("Invalid request URL {joined}: {e}")))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Decodes a response body: JSON when possible, `Null` when empty, the raw
/// text otherwise.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.build_url(&request.path)?;
        debug!("building request for {} {url}", request.method);

        let mut builder = self.client.request(to_method(request.method), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::network(format!("Request timed out: {e}"))
            } else {
                AppError::network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::network(format!("Failed to read response body: {e}")))?;

        debug!(status, "response received");
        Ok(ApiResponse::new(status, parse_body(&text)))
    }
}
