//! HTTP transport implementations.
//!
//! - [`ReqwestTransport`] - `reqwest` client with fixed timeouts

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
