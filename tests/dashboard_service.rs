mod common;

use chrono::{FixedOffset, TimeZone};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_overview_counts_clicks_per_link() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/shorten/");
            then.status(200).json_body(json!({
                "short_urls": [
                    common::link_json("id-1", "abc", "https://a.example"),
                    common::link_json("id-2", "def", "https://b.example")
                ]
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/shorten/visits/");
            then.status(200).json_body(json!({
                "visits": [
                    common::visit_json("v1", "id-2", "2025-03-01T09:00:00Z"),
                    common::visit_json("v2", "id-2", "2025-03-02T09:00:00Z"),
                    common::visit_json("v3", "id-1", "2025-03-03T09:00:00Z")
                ]
            }));
        })
        .await;

    let state = common::logged_in_state(&server, "token", "refresh");

    let rows = state.dashboard.overview().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].link.slug, "abc");
    assert_eq!(rows[0].clicks, 1);
    assert_eq!(rows[1].clicks, 2);
    assert_eq!(rows[1].short_url, "https://sho.rt/def");
}

#[tokio::test]
async fn test_link_report_in_local_time_zone() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/shorten/");
            then.status(200).json_body(json!({
                "short_urls": [common::link_json("id-1", "abc", "https://a.example")]
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/shorten/visits/abc");
            then.status(200).json_body(json!({
                "visits": [
                    // 23:30 UTC on the 13th is already the 14th at UTC+2
                    common::visit_json("v1", "id-1", "2025-03-13T23:30:00Z"),
                    common::visit_json("v2", "id-1", "2025-03-13T12:00:00Z"),
                    common::visit_json("v3", "id-1", "2024-12-20T12:00:00Z")
                ]
            }));
        })
        .await;

    let state = common::logged_in_state(&server, "token", "refresh");

    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    let report = state.dashboard.link_report("abc", &now).await.unwrap();

    let summary = report.summary.unwrap();
    assert_eq!(summary.today, 1);
    assert_eq!(summary.yesterday, 1);
    assert_eq!(summary.total, 3);

    assert_eq!(report.daily.len(), 14);
    assert_eq!(report.daily[13].visits, 1);
    assert_eq!(report.daily[12].visits, 1);

    let keys: Vec<&str> = report.monthly.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, ["2024-10", "2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]);
    assert_eq!(report.monthly[2].visits, 1);
    assert_eq!(report.monthly[5].visits, 2);

    assert_eq!(report.history[0].id, "v1");
    assert_eq!(report.history[2].id, "v3");
}

#[tokio::test]
async fn test_link_report_unknown_slug() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/shorten/");
            then.status(200).json_body(json!({ "short_urls": [] }));
        })
        .await;

    let state = common::logged_in_state(&server, "token", "refresh");
    let now = chrono::Utc::now();

    let err = state.dashboard.link_report("ghost", &now).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "URL not found");
}
