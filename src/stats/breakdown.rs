//! Activity and spot breakdowns

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{countable, fail_soft, BucketTotals, StatsError};
use crate::models::SessionWithDetails;

/// Label for sessions whose activity or spot no longer exists
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    #[serde(flatten)]
    pub totals: BucketTotals,
    /// Share of counted sessions, 0-100
    pub share: f64,
}

fn try_breakdown<F>(items: &[SessionWithDetails], key: F) -> Result<Vec<BreakdownEntry>, StatsError>
where
    F: Fn(&SessionWithDetails) -> Option<&str>,
{
    let mut groups: BTreeMap<String, BucketTotals> = BTreeMap::new();
    for item in countable(items) {
        let name = key(item).unwrap_or(UNKNOWN_LABEL).to_string();
        groups.entry(name).or_default().add_session(item)?;
    }

    let total: u32 = groups.values().map(|t| t.sessions).sum();
    let mut entries: Vec<BreakdownEntry> = groups
        .into_iter()
        .map(|(name, totals)| BreakdownEntry {
            share: if total == 0 {
                0.0
            } else {
                totals.sessions as f64 * 100.0 / total as f64
            },
            name,
            totals,
        })
        .collect();

    // Stable: equal counts stay in name order
    entries.sort_by(|a, b| b.totals.sessions.cmp(&a.totals.sessions));
    Ok(entries)
}

/// Sessions per activity, most used first
pub fn by_activity(items: &[SessionWithDetails]) -> Vec<BreakdownEntry> {
    fail_soft("Activity", try_breakdown(items, |item| item.activity_name()))
}

/// Sessions per spot, most used first
pub fn by_spot(items: &[SessionWithDetails]) -> Vec<BreakdownEntry> {
    fail_soft("Spot", try_breakdown(items, |item| item.spot_name()))
}
