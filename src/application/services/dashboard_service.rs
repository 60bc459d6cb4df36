//! Dashboard views composed from link and visit data.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::json;

use super::url_service::UrlService;
use crate::domain::analytics::{self, DailyBucket, MonthlyBucket, VisitSummary};
use crate::domain::entities::{Link, Visit};
use crate::error::AppError;

/// One row of the links table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOverview {
    pub link: Link,
    pub short_url: String,
    pub clicks: u64,
    pub last_visit: Option<DateTime<Utc>>,
}

/// Analytics page for a single link.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub link: Link,
    pub short_url: String,
    /// `None` when the link has never been visited.
    pub summary: Option<VisitSummary>,
    pub daily: Vec<DailyBucket>,
    pub monthly: Vec<MonthlyBucket>,
    /// Newest first.
    pub history: Vec<Visit>,
}

/// Service combining [`UrlService`] fetches with [`analytics`].
pub struct DashboardService {
    urls: Arc<UrlService>,
}

impl DashboardService {
    pub fn new(urls: Arc<UrlService>) -> Self {
        Self { urls }
    }

    /// Lists every link with its click count and last visit.
    ///
    /// The link list and the full visit log are fetched concurrently; counts
    /// are derived from the log rather than trusted from the server.
    ///
    /// # Errors
    ///
    /// Returns the first failure of either fetch.
    pub async fn overview(&self) -> Result<Vec<LinkOverview>, AppError> {
        let (links, visits) = tokio::try_join!(self.urls.list(), self.urls.visits(None))?;
        let activity = analytics::activity_by_link(&visits);

        Ok(links
            .into_iter()
            .map(|link| {
                let stats = activity.get(&link.id);
                LinkOverview {
                    short_url: self.urls.short_url(&link.slug),
                    clicks: stats.map_or(0, |s| s.clicks),
                    last_visit: stats.map(|s| s.last_visit),
                    link,
                }
            })
            .collect())
    }

    /// Builds the analytics report for `slug` relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with status 404 if the user owns no
    /// link with this slug.
    pub async fn link_report<Tz: TimeZone>(
        &self,
        slug: &str,
        now: &DateTime<Tz>,
    ) -> Result<LinkReport, AppError> {
        let link = self
            .urls
            .list()
            .await?
            .into_iter()
            .find(|link| link.slug == slug)
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "slug": slug })))?;

        let visits = self.urls.visits(Some(slug)).await?;

        Ok(LinkReport {
            short_url: self.urls.short_url(&link.slug),
            summary: analytics::summary(&visits, now),
            daily: analytics::daily_series(&visits, now),
            monthly: analytics::monthly_series(&visits, now),
            history: analytics::sorted_by_recency(&visits)
                .into_iter()
                .cloned()
                .collect(),
            link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{ApiClient, CredentialRefresher, TokenStore};
    use crate::domain::entities::CredentialPair;
    use crate::domain::repositories::{
        ApiResponse, HttpTransport, MockCredentialStorage, MockHttpTransport,
    };
    use chrono::FixedOffset;

    fn service(transport: MockHttpTransport) -> DashboardService {
        let mut storage = MockCredentialStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().returning(|_, _| Ok(()));
        storage.expect_remove().returning(|_| Ok(()));

        let store = Arc::new(TokenStore::open(Arc::new(storage)).unwrap());
        store.set(CredentialPair::new("a", "r", None)).unwrap();

        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let refresher = Arc::new(CredentialRefresher::new(transport.clone(), store.clone()));
        let client = Arc::new(ApiClient::new(transport, store, refresher));
        let urls = Arc::new(UrlService::new(client, "https://sho.rt".to_string()));
        DashboardService::new(urls)
    }

    fn links_body() -> serde_json::Value {
        json!({ "short_urls": [
            { "id": "id-1", "slug": "abc", "url": "https://a.example", "user_id": "u" },
            { "id": "id-2", "slug": "def", "url": "https://b.example", "user_id": "u" }
        ] })
    }

    #[tokio::test]
    async fn test_overview_derives_clicks_from_log() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, links_body())));
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/visits/")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    json!({ "visits": [
                        { "id": "v1", "shortened_url_id": "id-1", "visit_time": "2025-03-10T08:00:00Z" },
                        { "id": "v2", "shortened_url_id": "id-1", "visit_time": "2025-03-12T08:00:00Z" }
                    ] }),
                ))
            });

        let rows = service(transport).overview().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].clicks, 2);
        assert_eq!(rows[0].short_url, "https://sho.rt/abc");
        assert_eq!(
            rows[0].last_visit,
            Some(Utc.with_ymd_and_hms(2025, 3, 12, 8, 0, 0).unwrap())
        );
        assert_eq!(rows[1].clicks, 0);
        assert!(rows[1].last_visit.is_none());
    }

    #[tokio::test]
    async fn test_link_report_unknown_slug() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, links_body())));

        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let err = service(transport)
            .link_report("zzz", &now)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "URL not found");
    }

    #[tokio::test]
    async fn test_link_report_aggregates_visits() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/")
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, links_body())));
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/visits/abc")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    json!({ "visits": [
                        { "id": "v1", "shortened_url_id": "id-1", "visit_time": "2025-03-13T08:00:00Z" },
                        { "id": "v2", "shortened_url_id": "id-1", "visit_time": "2025-03-14T08:00:00Z" }
                    ] }),
                ))
            });

        let tz = FixedOffset::east_opt(0).unwrap();
        let now = tz.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let report = service(transport).link_report("abc", &now).await.unwrap();

        let summary = report.summary.unwrap();
        assert_eq!(summary.today, 1);
        assert_eq!(summary.yesterday, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(report.daily.len(), analytics::DAILY_WINDOW_DAYS);
        assert_eq!(report.daily.last().map(|b| b.visits), Some(1));
        assert_eq!(report.monthly.len(), analytics::MONTHLY_WINDOW_MONTHS);
        assert_eq!(report.history[0].id, "v2");
    }

    #[tokio::test]
    async fn test_link_report_without_visits_has_no_summary() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/")
            .returning(|_| Ok(ApiResponse::new(200, links_body())));
        transport
            .expect_send()
            .withf(|req| req.path == "/shorten/visits/def")
            .returning(|_| Ok(ApiResponse::new(200, json!({ "visits": null }))));

        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let report = service(transport).link_report("def", &now).await.unwrap();

        assert!(report.summary.is_none());
        assert!(report.daily.iter().all(|b| b.visits == 0));
        assert!(report.history.is_empty());
    }
}
