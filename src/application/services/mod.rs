//! Business logic services for the application layer.

pub mod api_client;
pub mod auth_service;
pub mod credential_refresher;
pub mod dashboard_service;
pub mod token_store;
pub mod url_service;

pub use api_client::ApiClient;
pub use auth_service::AuthService;
pub use credential_refresher::CredentialRefresher;
pub use dashboard_service::{DashboardService, LinkOverview, LinkReport};
pub use token_store::TokenStore;
pub use url_service::UrlService;
