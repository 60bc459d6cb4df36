//! Wire contract of the remote shortening service.
//!
//! This layer describes request and response bodies exactly as they travel
//! over HTTP and converts them into domain entities. Nothing here performs
//! I/O; requests are sent by [`crate::application::services::ApiClient`].
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization

pub mod dto;
