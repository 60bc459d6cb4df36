//! Infrastructure layer for external integrations.
//!
//! This layer implements the traits defined by the domain layer, providing
//! concrete implementations for the network and local persistence.
//!
//! # Modules
//!
//! - [`http`] - `reqwest` transport to the remote service
//! - [`storage`] - File-backed and in-memory credential storage

pub mod http;
pub mod storage;
