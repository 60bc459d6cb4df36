//! Visit-log aggregation into time-bucketed series and rollup counters.
//!
//! Every function here is pure: the output depends only on the visit slice
//! and the reference instant `now`. The time zone carried by `now` defines
//! what a "day" is, so callers pass `Local::now()` for client-local semantics
//! and tests pass a fixed offset.
//!
//! # Windows
//!
//! - [`daily_series`] - 14 calendar days ending today, oldest first
//! - [`monthly_series`] - 6 calendar months ending with the current month
//! - [`summary`] - today / yesterday (calendar), last week / last month (rolling)
//!
//! Events outside a window are ignored by that window; nothing here fails.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::domain::entities::Visit;

/// Number of daily buckets produced by [`daily_series`].
pub const DAILY_WINDOW_DAYS: usize = 14;

/// Number of monthly buckets produced by [`monthly_series`].
pub const MONTHLY_WINDOW_MONTHS: usize = 6;

/// Visit count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub day: NaiveDate,
    /// `YYYY-MM-DD`
    pub key: String,
    pub visits: u64,
    /// Short weekday name, e.g. `Mon`.
    pub weekday_label: String,
    /// Short month and day, e.g. `Jan 5`.
    pub display_label: String,
}

impl DailyBucket {
    fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            key: day.format("%Y-%m-%d").to_string(),
            visits: 0,
            weekday_label: day.format("%a").to_string(),
            display_label: day.format("%b %-d").to_string(),
        }
    }
}

/// Visit count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`
    pub key: String,
    pub visits: u64,
    /// Short month and year, e.g. `Jan 2025`.
    pub display_label: String,
}

impl MonthlyBucket {
    fn empty(year: i32, month: u32) -> Self {
        let display_label = NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| first.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{year}-{month:02}"));

        Self {
            year,
            month,
            key: format!("{year}-{month:02}"),
            visits: 0,
            display_label,
        }
    }
}

/// Rollup counters for a visit collection.
///
/// `last_week` and `last_month` are rolling windows relative to `now` and
/// overlap `today`/`yesterday`; `total` ignores every window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VisitSummary {
    pub today: u64,
    pub yesterday: u64,
    pub last_week: u64,
    pub last_month: u64,
    pub total: u64,
}

/// Per-link activity derived from the visit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkActivity {
    pub clicks: u64,
    pub last_visit: DateTime<Utc>,
}

/// Builds 14 daily buckets for `[today - 13d, today]` in `now`'s time zone.
///
/// All buckets are zero-filled before counting, so the result always has
/// [`DAILY_WINDOW_DAYS`] entries in ascending order.
pub fn daily_series<Tz: TimeZone>(events: &[Visit], now: &DateTime<Tz>) -> Vec<DailyBucket> {
    let tz = now.timezone();
    let today = now.date_naive();
    let span = DAILY_WINDOW_DAYS as i64;

    let mut buckets: Vec<DailyBucket> = (0..DAILY_WINDOW_DAYS as u64)
        .rev()
        .map(|offset| DailyBucket::empty(today - Days::new(offset)))
        .collect();

    for event in events {
        let day = local_day(&event.visited_at, &tz);
        let offset = today.signed_duration_since(day).num_days();
        if (0..span).contains(&offset) {
            buckets[(span - 1 - offset) as usize].visits += 1;
        }
    }

    buckets
}

/// Builds 6 monthly buckets ending with the current month of `now`.
///
/// The window is computed on (year, month) pairs, so a `now` on the 31st
/// never skips or repeats a shorter month.
pub fn monthly_series<Tz: TimeZone>(events: &[Visit], now: &DateTime<Tz>) -> Vec<MonthlyBucket> {
    let tz = now.timezone();
    let current = month_index(now.year(), now.month());
    let span = MONTHLY_WINDOW_MONTHS as i64;

    let mut buckets: Vec<MonthlyBucket> = (0..span)
        .rev()
        .map(|back| {
            let (year, month) = from_month_index(current - back);
            MonthlyBucket::empty(year, month)
        })
        .collect();

    for event in events {
        let local = event.visited_at.with_timezone(&tz);
        let back = current - month_index(local.year(), local.month());
        if (0..span).contains(&back) {
            buckets[(span - 1 - back) as usize].visits += 1;
        }
    }

    buckets
}

/// Computes rollup counters, or `None` for an empty collection.
///
/// - `today` / `yesterday`: exact local calendar-day match
/// - `last_week`: `visited_at >= now - 7 days` (local calendar days)
/// - `last_month`: `visited_at >= now - 1 month` (day clamped to month end)
/// - `total`: every event passed in
pub fn summary<Tz: TimeZone>(events: &[Visit], now: &DateTime<Tz>) -> Option<VisitSummary> {
    if events.is_empty() {
        return None;
    }

    let tz = now.timezone();
    let today = now.date_naive();
    let yesterday = today.pred_opt();
    let week_cutoff = week_ago(now);
    let month_cutoff = month_ago(now);

    let mut counters = VisitSummary {
        total: events.len() as u64,
        ..VisitSummary::default()
    };

    for event in events {
        let day = local_day(&event.visited_at, &tz);
        if day == today {
            counters.today += 1;
        }
        if Some(day) == yesterday {
            counters.yesterday += 1;
        }
        if event.visited_at >= week_cutoff {
            counters.last_week += 1;
        }
        if event.visited_at >= month_cutoff {
            counters.last_month += 1;
        }
    }

    Some(counters)
}

/// Returns the visits ordered newest first.
///
/// The sort is stable: visits with identical timestamps keep their relative
/// order from the input.
pub fn sorted_by_recency(events: &[Visit]) -> Vec<&Visit> {
    let mut sorted: Vec<&Visit> = events.iter().collect();
    sorted.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
    sorted
}

/// Returns the most recent visit, i.e. the first element of
/// [`sorted_by_recency`], without sorting.
pub fn most_recent(events: &[Visit]) -> Option<&Visit> {
    events.iter().reduce(|best, candidate| {
        if candidate.visited_at > best.visited_at {
            candidate
        } else {
            best
        }
    })
}

/// Groups the log by link id into click counts and last-visit instants.
///
/// Derived on every call from the full log; links without visits are absent.
pub fn activity_by_link(events: &[Visit]) -> HashMap<String, LinkActivity> {
    let mut activity: HashMap<String, LinkActivity> = HashMap::new();

    for event in events {
        activity
            .entry(event.link_id.clone())
            .and_modify(|entry| {
                entry.clicks += 1;
                if event.visited_at > entry.last_visit {
                    entry.last_visit = event.visited_at;
                }
            })
            .or_insert(LinkActivity {
                clicks: 1,
                last_visit: event.visited_at,
            });
    }

    activity
}

fn local_day<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

fn from_month_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

/// `now` minus one calendar month, as a UTC instant.
///
/// Local arithmetic can land in a DST gap; in that case the subtraction is
/// done on the UTC clock instead.
fn week_ago<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    now.clone()
        .checked_sub_days(Days::new(7))
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc) - Duration::days(7))
}

fn month_ago<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    now.clone()
        .checked_sub_months(Months::new(1))
        .map(|local| local.with_timezone(&Utc))
        .or_else(|| now.with_timezone(&Utc).checked_sub_months(Months::new(1)))
        .unwrap_or_else(|| now.with_timezone(&Utc) - Duration::days(30))
}
