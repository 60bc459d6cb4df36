//! DTOs for the visit log endpoints under `/shorten/visits/`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_with::{DefaultOnNull, serde_as};

use crate::domain::entities::Visit;

/// A single recorded click.
#[derive(Debug, Deserialize)]
pub struct VisitPayload {
    #[serde(deserialize_with = "super::flexible_id::deserialize")]
    pub id: String,
    #[serde(
        alias = "shortenedUrlId",
        deserialize_with = "super::flexible_id::deserialize"
    )]
    pub shortened_url_id: String,
    #[serde(alias = "visitTime", with = "visit_time")]
    pub visit_time: DateTime<Utc>,
}

impl From<VisitPayload> for Visit {
    fn from(payload: VisitPayload) -> Self {
        Visit::new(payload.id, payload.shortened_url_id, payload.visit_time)
    }
}

/// Response of `GET /shorten/visits/` and `GET /shorten/visits/{slug}`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct VisitsResponse {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub visits: Vec<VisitPayload>,
}

/// Parses the timestamp formats the service emits.
///
/// Accepted, in order:
/// 1. RFC 3339 (`2025-03-14T10:00:00Z`, `2025-03-14T10:00:00+02:00`)
/// 2. Space-separated with offset (`2025-03-14 10:00:00.123456+00:00`)
/// 3. Naive ISO or space-separated, interpreted as UTC
pub fn parse_visit_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Converts a Unix epoch in seconds or milliseconds.
fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    // Anything past year 5138 in seconds is treated as milliseconds.
    if value.unsigned_abs() >= 100_000_000_000 {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// Custom Serde deserializer for visit timestamps (string or epoch number).
mod visit_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Text(String),
        Epoch(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTime::deserialize(deserializer)? {
            RawTime::Text(s) => super::parse_visit_time(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid visit time: {s}"))),
            RawTime::Epoch(n) => super::from_epoch(n)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid visit epoch: {n}"))),
        }
    }
}
