//! Helper functions shared across layers.
//!
//! - [`short_url`] - Base URL validation and short link formatting

pub mod short_url;
