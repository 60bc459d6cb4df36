//! Error taxonomy shared by every client layer.
//!
//! The API client recovers exactly one class locally ([`AppError::AuthExpired`],
//! via a single retry after a credential refresh). Every other variant is
//! surfaced to the caller unmodified.

use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// First 401 for a request; triggers a credential refresh.
    #[error("Access token expired")]
    AuthExpired,

    /// Session is no longer usable and the user must log in again.
    #[error("Authentication rejected: {message}")]
    AuthRejected { message: String },

    /// No response was received (connection failure, timeout).
    #[error("Network failure: {message}")]
    Network { message: String },

    /// 4xx other than 401, with the server-provided message.
    #[error("{message}")]
    Validation {
        status: u16,
        message: String,
        details: Value,
    },

    /// 5xx, with the server-provided message.
    #[error("Server error ({status}): {message}")]
    Server {
        status: u16,
        message: String,
        details: Value,
    },

    /// A successful response whose body did not have the expected shape.
    #[error("Unexpected response: {message}")]
    Decode { message: String },

    /// The durable credential store could not be read or written.
    #[error("Credential storage error: {message}")]
    Storage { message: String },
}

impl AppError {
    pub fn auth_rejected(message: impl Into<String>) -> Self {
        Self::AuthRejected {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn validation(status: u16, message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::validation(404, message, details)
    }

    pub fn server(status: u16, message: impl Into<String>, details: Value) -> Self {
        Self::Server {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Classifies a non-success HTTP status and its JSON body.
    ///
    /// The message is taken from the body's `message` field when present,
    /// otherwise a generic description of the status is used.
    pub fn from_status(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| default_message(status).to_string());

        match status {
            401 => Self::AuthExpired,
            500..=599 => Self::server(status, message, body),
            _ => Self::validation(status, message, body),
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthExpired | Self::AuthRejected { .. } => Some(401),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the session must be re-established by logging in.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthExpired | Self::AuthRejected { .. })
    }

    /// Structured representation for JSON log output.
    pub fn to_json(&self) -> Value {
        let (code, details) = match self {
            Self::AuthExpired => ("auth_expired", Value::Null),
            Self::AuthRejected { .. } => ("auth_rejected", Value::Null),
            Self::Network { .. } => ("network_failure", Value::Null),
            Self::Validation { details, .. } => ("validation_failure", details.clone()),
            Self::Server { details, .. } => ("server_failure", details.clone()),
            Self::Decode { .. } => ("decode_failure", Value::Null),
            Self::Storage { .. } => ("storage_failure", Value::Null),
        };

        json!({
            "code": code,
            "status": self.status(),
            "message": self.to_string(),
            "details": details,
        })
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        422 => "Unprocessable entity",
        429 => "Too many requests",
        500..=599 => "Internal server error",
        _ => "Request failed",
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}
