//! Visit entity representing a single recorded click.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A click on a shortened link.
///
/// Visits are immutable and append-only. The remote service gives no ordering
/// guarantee, so consumers sort explicitly wherever chronology matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub id: String,
    pub link_id: String,
    pub visited_at: DateTime<Utc>,
}

impl Visit {
    /// Creates a new Visit instance.
    pub fn new(
        id: impl Into<String>,
        link_id: impl Into<String>,
        visited_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            link_id: link_id.into(),
            visited_at,
        }
    }
}
