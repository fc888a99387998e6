//! Revenue statistics
//!
//! Reduces sessions into chartable totals:
//! - Dense daily and monthly series (every bucket present, zero-filled)
//! - Activity and spot breakdowns
//! - KPI totals over a series
//!
//! Archived sessions never count. Cancelled bookings add nothing to
//! clients or revenue, but their session is still counted.

pub mod breakdown;
pub mod daily;
pub mod monthly;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::SessionWithDetails;

pub use breakdown::{by_activity, by_spot, BreakdownEntry};
pub use daily::{daily_series, DailyStat};
pub use monthly::{monthly_series, MonthlyStat};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Non-finite price on session {0}")]
    NonFiniteRevenue(String),

    #[error("Date range out of bounds")]
    DateOutOfRange,
}

/// Running totals of one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketTotals {
    pub sessions: u32,
    pub clients: u32,
    pub revenue: f64,
}

impl BucketTotals {
    /// Count a session and its non-cancelled bookings
    pub fn add_session(&mut self, item: &SessionWithDetails) -> Result<(), StatsError> {
        let revenue = item.income();
        if !revenue.is_finite() {
            return Err(StatsError::NonFiniteRevenue(item.session.id.clone()));
        }
        self.sessions += 1;
        self.clients += item.clients();
        self.revenue += revenue;
        Ok(())
    }

    fn merge(&mut self, other: &BucketTotals) {
        self.sessions += other.sessions;
        self.clients += other.clients;
        self.revenue += other.revenue;
    }
}

/// KPI totals summed over a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTotals {
    pub sessions: u32,
    pub clients: u32,
    pub revenue: f64,
}

impl StatsTotals {
    pub fn from_buckets<'a>(buckets: impl IntoIterator<Item = &'a BucketTotals>) -> Self {
        let mut sum = BucketTotals::default();
        for bucket in buckets {
            sum.merge(bucket);
        }
        Self {
            sessions: sum.sessions,
            clients: sum.clients,
            revenue: sum.revenue,
        }
    }
}

/// Sessions that take part in statistics
pub fn countable(items: &[SessionWithDetails]) -> impl Iterator<Item = &SessionWithDetails> {
    items.iter().filter(|item| !item.session.is_archived())
}

/// Replace a failed computation with an empty result
fn fail_soft<T: Default>(what: &str, result: Result<T, StatsError>) -> T {
    result.unwrap_or_else(|e| {
        warn!("{} statistics unavailable: {}", what, e);
        T::default()
    })
}
