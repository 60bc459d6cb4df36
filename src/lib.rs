//! # Shortener Dashboard
//!
//! Client for a URL shortening service: session-authenticated API access and
//! client-side visit analytics.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, analytics, and I/O traits
//! - **Application Layer** ([`application`]) - Token store, refresher, API client, and services
//! - **Infrastructure Layer** ([`infrastructure`]) - `reqwest` transport and credential storage
//! - **API Layer** ([`api`]) - Wire DTOs of the remote service
//!
//! ## Features
//!
//! - Transparent access token renewal, coalesced across concurrent requests
//! - Durable session across restarts
//! - Daily, monthly and rollup visit statistics in the local time zone
//!
//! ## Quick Start
//!
//! ```bash
//! export API_BASE_URL="http://localhost:8000"
//!
//! cargo run -- login
//! cargo run -- shorten https://www.rust-lang.org
//! cargo run -- stats
//! ```
//!
//! ## Configuration
//!
//! Client configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ApiClient, AuthService, CredentialRefresher, DashboardService, TokenStore, UrlService,
    };
    pub use crate::domain::analytics::{DailyBucket, MonthlyBucket, VisitSummary};
    pub use crate::domain::entities::{CredentialPair, Link, LinkUpdate, User, Visit};
    pub use crate::domain::session_event::SessionEvent;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
