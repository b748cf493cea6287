//! Aggregate views over enriched query results.
//!
//! Used by the presentation layer to summarise a result page: the distinct
//! tags, counts per field value, and a few simple trends.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use domain::{EnrichedRecord, Timestamp};

/// Status counted as finished for [`Trends::completion_rate`].
pub const COMPLETED_STATUS: &str = "已完成";

/// Window used for [`Trends::weekly_growth`].
pub const GROWTH_WINDOW_DAYS: i64 = 7;

/// Simple trend indicators for a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    /// Records created within the last [`GROWTH_WINDOW_DAYS`] days.
    pub weekly_growth: usize,
    /// Share of records in [`COMPLETED_STATUS`], in percent. `0.0` for no records.
    pub completion_rate: f64,
    /// Mean priority. `0.0` for no records.
    pub average_priority: f64,
}

/// Summary of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInsights {
    pub all_tags: Vec<String>,
    pub by_category: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub trends: Trends,
}

/// Distinct tags across `items`, in first-seen order.
pub fn all_tags(items: &[EnrichedRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in items.iter().flat_map(|item| item.tags.iter()) {
        if !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}

/// Number of items per value of the field selected by `key`.
pub fn group_by<F>(items: &[EnrichedRecord], key: F) -> BTreeMap<String, usize>
where
    F: Fn(&EnrichedRecord) -> &str,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(item).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Trend indicators relative to `now`.
///
/// Records whose `createdAt` does not parse as a date are never counted as
/// recent.
pub fn trends(items: &[EnrichedRecord], now: Timestamp) -> Trends {
    if items.is_empty() {
        return Trends {
            weekly_growth: 0,
            completion_rate: 0.0,
            average_priority: 0.0,
        };
    }

    let window_start = now.as_datetime() - Duration::days(GROWTH_WINDOW_DAYS);
    let weekly_growth = items
        .iter()
        .filter_map(|item| created_at(&item.record.created_at))
        .filter(|created| *created > window_start)
        .count();

    let total = items.len() as f64;
    let completed = items
        .iter()
        .filter(|item| item.record.status == COMPLETED_STATUS)
        .count() as f64;
    let priority_sum: u32 = items.iter().map(|item| item.priority).sum();

    Trends {
        weekly_growth,
        completion_rate: completed / total * 100.0,
        average_priority: f64::from(priority_sum) / total,
    }
}

/// All of the above in one value.
pub fn summarize(items: &[EnrichedRecord], now: Timestamp) -> QueryInsights {
    QueryInsights {
        all_tags: all_tags(items),
        by_category: group_by(items, |item| item.record.category.as_str()),
        by_status: group_by(items, |item| item.record.status.as_str()),
        by_type: group_by(items, |item| item.record.kind.as_str()),
        trends: trends(items, now),
    }
}

fn created_at(value: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Some(ts) = Timestamp::parse_rfc3339(value) {
        return Some(ts.as_datetime());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
