//! Trait definitions for the client's external collaborators.
//!
//! The core never talks to the network or the filesystem directly. It goes
//! through these traits, which are implemented in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for I/O operations
//! - Implementations live in `crate::infrastructure`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Traits
//!
//! - [`CredentialStorage`] - Durable key-value store for session tokens
//! - [`HttpTransport`] - Raw request/response transport to the remote service

pub mod credential_storage;
pub mod http_transport;

pub use credential_storage::CredentialStorage;
pub use http_transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};

#[cfg(test)]
pub use credential_storage::MockCredentialStorage;
#[cfg(test)]
pub use http_transport::MockHttpTransport;
