//! Application layer services implementing the client's behaviour.
//!
//! Services coordinate the domain traits, the wire DTOs and the analytics
//! functions. They hold their collaborators behind `Arc` so a single
//! [`crate::state::AppState`] can hand them to concurrent tasks.
//!
//! # Available Services
//!
//! - [`services::token_store::TokenStore`] - Current credential pair, persisted
//! - [`services::credential_refresher::CredentialRefresher`] - Coalesced token renewal
//! - [`services::api_client::ApiClient`] - Authenticated requests with one retry
//! - [`services::url_service::UrlService`] - Link and visit endpoints
//! - [`services::auth_service::AuthService`] - Login, registration, logout
//! - [`services::dashboard_service::DashboardService`] - Overview and per-link reports

pub mod services;
