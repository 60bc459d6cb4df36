//! Link management through the remote `/shorten/` resource.

use std::sync::Arc;

use super::api_client::ApiClient;
use crate::api::dto::shorten::{
    DeleteRequest, LinkEnvelope, ListResponse, ShortenRequest, UpdateRequest,
};
use crate::api::dto::visits::VisitsResponse;
use crate::domain::entities::{Link, LinkUpdate, Visit};
use crate::domain::repositories::HttpMethod;
use crate::error::AppError;
use crate::utils::short_url::format_short_url;

pub const SHORTEN_PATH: &str = "/shorten/";
pub const VISITS_PATH: &str = "/shorten/visits/";

/// Thin client for the link and visit endpoints.
///
/// Every call goes through the authenticated [`ApiClient`]; results are
/// returned as fetched, without caching.
pub struct UrlService {
    client: Arc<ApiClient>,
    short_link_base: String,
}

impl UrlService {
    /// Creates a new URL service.
    ///
    /// # Arguments
    ///
    /// - `client` - authenticated API client
    /// - `short_link_base` - public base that short links are served under
    pub fn new(client: Arc<ApiClient>, short_link_base: String) -> Self {
        Self {
            client,
            short_link_base,
        }
    }

    /// Shortens `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the service rejects the URL.
    pub async fn create(&self, url: &str) -> Result<Link, AppError> {
        let body = serde_json::to_value(ShortenRequest { url })?;
        let envelope: LinkEnvelope = self
            .client
            .request(HttpMethod::Post, SHORTEN_PATH, Some(body))
            .await?;

        let link = envelope.into_link();
        tracing::debug!(slug = %link.slug, "Link created");
        Ok(link)
    }

    /// Lists every link owned by the user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn list(&self) -> Result<Vec<Link>, AppError> {
        let response: ListResponse = self
            .client
            .request(HttpMethod::Get, SHORTEN_PATH, None)
            .await?;

        Ok(response.short_urls.into_iter().map(Link::from).collect())
    }

    /// Changes the destination and optionally the slug of a link.
    ///
    /// The link keeps its id when the slug changes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist or the new
    /// slug is taken.
    pub async fn update(&self, update: &LinkUpdate) -> Result<Link, AppError> {
        let body = serde_json::to_value(UpdateRequest::from(update))?;
        let envelope: LinkEnvelope = self
            .client
            .request(HttpMethod::Put, SHORTEN_PATH, Some(body))
            .await?;

        Ok(envelope.into_link())
    }

    /// Deletes the link addressed by `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the link does not exist.
    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        let body = serde_json::to_value(DeleteRequest { slug })?;
        self.client
            .send(HttpMethod::Delete, SHORTEN_PATH, Some(body))
            .await?;

        tracing::debug!(slug, "Link deleted");
        Ok(())
    }

    /// Fetches the visit log of one link, or of every link when `slug` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; [`AppError::Decode`] for unparseable
    /// timestamps; [`AppError::Validation`] for a slug that cannot name a
    /// single path segment.
    pub async fn visits(&self, slug: Option<&str>) -> Result<Vec<Visit>, AppError> {
        let path = match slug {
            Some(slug) => visits_path(slug)?,
            None => VISITS_PATH.to_string(),
        };
        let response: VisitsResponse = self.client.request(HttpMethod::Get, &path, None).await?;

        Ok(response.visits.into_iter().map(Visit::from).collect())
    }

    /// Public short URL for `slug`.
    pub fn short_url(&self, slug: &str) -> String {
        format_short_url(&self.short_link_base, slug)
    }
}

/// Path of the visit log for one slug, encoded as a single segment.
fn visits_path(slug: &str) -> Result<String, AppError> {
    if matches!(slug, "" | "." | "..") {
        return Err(AppError::validation(
            400,
            format!("Invalid slug: {slug:?}"),
            serde_json::json!({ "slug": slug }),
        ));
    }

    Ok(format!("{VISITS_PATH}{}", urlencoding::encode(slug)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{CredentialRefresher, TokenStore};
    use crate::domain::entities::CredentialPair;
    use crate::domain::repositories::{
        ApiResponse, HttpTransport, MockCredentialStorage, MockHttpTransport,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn service(transport: MockHttpTransport) -> UrlService {
        let mut storage = MockCredentialStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().returning(|_, _| Ok(()));
        storage.expect_remove().returning(|_| Ok(()));

        let store = Arc::new(TokenStore::open(Arc::new(storage)).unwrap());
        store.set(CredentialPair::new("a", "r", None)).unwrap();

        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let refresher = Arc::new(CredentialRefresher::new(transport.clone(), store.clone()));
        let client = Arc::new(ApiClient::new(transport, store, refresher));
        UrlService::new(client, "https://sho.rt".to_string())
    }

    #[tokio::test]
    async fn test_create_wrapped_response() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == HttpMethod::Post
                    && req.path == SHORTEN_PATH
                    && req.body == Some(json!({ "url": "https://example.com" }))
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    201,
                    json!({
                        "message": "Short URL created successfully!",
                        "data": { "id": "id-1", "slug": "abc", "url": "https://example.com", "user_id": "u-1" }
                    }),
                ))
            });

        let link = service(transport).create("https://example.com").await.unwrap();

        assert_eq!(link, Link::new("id-1", "abc", "https://example.com", "u-1"));
    }

    #[tokio::test]
    async fn test_list_null_is_empty() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, json!({ "short_urls": null }))));

        let links = service(transport).list().await.unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_id_on_slug_change() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == HttpMethod::Put
                    && req.body
                        == Some(json!({
                            "slug": "abc",
                            "updated_url": "https://new.example.com",
                            "updated_slug": "xyz"
                        }))
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    json!({ "id": "id-1", "slug": "xyz", "url": "https://new.example.com", "user_id": "u-1" }),
                ))
            });

        let update = LinkUpdate::url("abc", "https://new.example.com").with_new_slug("xyz");
        let link = service(transport).update(&update).await.unwrap();

        assert_eq!(link.id, "id-1");
        assert_eq!(link.slug, "xyz");
    }

    #[tokio::test]
    async fn test_delete_sends_slug_in_body() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == HttpMethod::Delete
                    && req.path == SHORTEN_PATH
                    && req.body == Some(json!({ "slug": "abc" }))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, json!({ "message": "Deleted" }))));

        assert!(service(transport).delete("abc").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_link() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(404, json!({ "message": "URL not found" }))));

        let err = service(transport).delete("nope").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "URL not found");
    }

    #[tokio::test]
    async fn test_visits_for_slug() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/visits/abc")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    json!({ "visits": [
                        { "id": "v1", "shortened_url_id": "id-1", "visit_time": "2025-03-14T10:00:00Z" }
                    ] }),
                ))
            });

        let visits = service(transport).visits(Some("abc")).await.unwrap();

        assert_eq!(visits.len(), 1);
        assert_eq!(
            visits[0].visited_at,
            Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_visits_slug_is_one_encoded_segment() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/visits/..%2Fa%3Fb%23c")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, json!({ "visits": [] }))));

        let visits = service(transport).visits(Some("../a?b#c")).await.unwrap();

        assert!(visits.is_empty());
    }

    #[tokio::test]
    async fn test_visits_rejects_dot_segment_slug() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);

        let service = service(transport);

        for slug in ["", ".", ".."] {
            let err = service.visits(Some(slug)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { status: 400, .. }));
        }
    }

    #[tokio::test]
    async fn test_visits_for_all_links() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == VISITS_PATH)
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, json!({ "visits": [] }))));

        let visits = service(transport).visits(None).await.unwrap();

        assert!(visits.is_empty());
    }

    #[test]
    fn test_short_url() {
        let service = service(MockHttpTransport::new());
        assert_eq!(service.short_url("abc"), "https://sho.rt/abc");
    }
}
