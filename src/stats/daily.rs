//! Daily revenue series
//!
//! Buckets 31 consecutive days starting on the first of the current month,
//! or on today when forecasting.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{countable, fail_soft, BucketTotals, StatsError};
use crate::models::SessionWithDetails;

pub const DAYS_IN_SERIES: i64 = 31;

/// One day's totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    /// Day of month, e.g. "5"
    pub label: String,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

impl DailyStat {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            label: date.day().to_string(),
            totals: BucketTotals::default(),
        }
    }
}

/// First day of the series
pub fn series_start(today: NaiveDate, forecast: bool) -> NaiveDate {
    if forecast {
        today
    } else {
        today.with_day(1).unwrap_or(today)
    }
}

/// Zero-filled buckets for every day from `start`
fn empty_days(start: NaiveDate) -> Result<Vec<DailyStat>, StatsError> {
    (0..DAYS_IN_SERIES)
        .map(|offset| {
            start
                .checked_add_signed(Duration::days(offset))
                .map(DailyStat::new)
                .ok_or(StatsError::DateOutOfRange)
        })
        .collect()
}

fn try_daily_series(
    items: &[SessionWithDetails],
    today: NaiveDate,
    forecast: bool,
) -> Result<Vec<DailyStat>, StatsError> {
    let start = series_start(today, forecast);
    let mut days = empty_days(start)?;

    for item in countable(items) {
        let offset = (item.session.date - start).num_days();
        if (0..DAYS_IN_SERIES).contains(&offset) {
            days[offset as usize].totals.add_session(item)?;
        }
    }

    Ok(days)
}

/// Dense 31-day series; empty if the computation fails
pub fn daily_series(
    items: &[SessionWithDetails],
    today: NaiveDate,
    forecast: bool,
) -> Vec<DailyStat> {
    fail_soft("Daily", try_daily_series(items, today, forecast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{archived_on, booking, date, details, session_on};
    use crate::models::CustomerStatus;

    #[test]
    fn test_series_is_dense_from_first_of_month() {
        let days = daily_series(&[], date(2024, 2, 10), false);

        assert_eq!(days.len(), 31);
        assert_eq!(days[0].date, date(2024, 2, 1));
        // Runs past the end of a short month
        assert_eq!(days[30].date, date(2024, 3, 2));
        assert!(days.iter().all(|d| d.totals == BucketTotals::default()));
    }

    #[test]
    fn test_forecast_starts_today() {
        let days = daily_series(&[], date(2024, 2, 10), true);
        assert_eq!(days[0].date, date(2024, 2, 10));
        assert_eq!(days[0].label, "10");
    }

    #[test]
    fn test_sessions_land_on_their_day() {
        let items = vec![
            details(
                session_on("s1", 2024, 6, 5),
                vec![booking("c1", "s1", 2, 80.0, CustomerStatus::Validated)],
            ),
            details(session_on("s2", 2024, 6, 5), vec![]),
            details(archived_on("s3", 2024, 6, 5), vec![]),
            // Outside the window
            details(session_on("s4", 2024, 5, 31), vec![]),
        ];

        let days = daily_series(&items, date(2024, 6, 12), false);
        let fifth = &days[4];
        assert_eq!(fifth.date, date(2024, 6, 5));
        assert_eq!(fifth.totals.sessions, 2);
        assert_eq!(fifth.totals.clients, 2);
        assert_eq!(fifth.totals.revenue, 80.0);
        assert_eq!(days.iter().map(|d| d.totals.sessions).sum::<u32>(), 2);
    }

    #[test]
    fn test_failure_yields_empty_series() {
        let items = vec![details(
            session_on("s1", 2024, 6, 5),
            vec![booking("c1", "s1", 1, f64::INFINITY, CustomerStatus::Validated)],
        )];
        assert!(daily_series(&items, date(2024, 6, 1), false).is_empty());
    }
}
