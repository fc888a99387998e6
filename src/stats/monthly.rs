//! Monthly revenue series
//!
//! Twelve calendar months starting in January of the current year, or in
//! the current month when forecasting.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{countable, fail_soft, BucketTotals, StatsError};
use crate::models::SessionWithDetails;

pub const MONTHS_IN_SERIES: i32 = 12;

/// One month's totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub year: i32,
    /// 1-based
    pub month: u32,
    /// e.g. "June 2024"
    pub label: String,
    #[serde(flatten)]
    pub totals: BucketTotals,
}

impl MonthlyStat {
    fn new(first_day: NaiveDate) -> Self {
        Self {
            year: first_day.year(),
            month: first_day.month(),
            label: first_day.format("%B %Y").to_string(),
            totals: BucketTotals::default(),
        }
    }
}

/// Months elapsed since year 0, used to index buckets
fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}

fn empty_months(first: i32) -> Result<Vec<MonthlyStat>, StatsError> {
    (first..first + MONTHS_IN_SERIES)
        .map(|index| {
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, 1)
                .map(MonthlyStat::new)
                .ok_or(StatsError::DateOutOfRange)
        })
        .collect()
}

fn try_monthly_series(
    items: &[SessionWithDetails],
    today: NaiveDate,
    forecast: bool,
) -> Result<Vec<MonthlyStat>, StatsError> {
    let start_month = if forecast { today.month() } else { 1 };
    let first = month_index(today.year(), start_month);
    let mut months = empty_months(first)?;

    for item in countable(items) {
        let offset = month_index(item.session.date.year(), item.session.date.month()) - first;
        if (0..MONTHS_IN_SERIES).contains(&offset) {
            months[offset as usize].totals.add_session(item)?;
        }
    }

    Ok(months)
}

/// Dense 12-month series; empty if the computation fails
pub fn monthly_series(
    items: &[SessionWithDetails],
    today: NaiveDate,
    forecast: bool,
) -> Vec<MonthlyStat> {
    fail_soft("Monthly", try_monthly_series(items, today, forecast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{archived_on, booking, date, details, session_on};
    use crate::models::CustomerStatus;
    use crate::stats::StatsTotals;

    fn june_july() -> Vec<SessionWithDetails> {
        vec![
            details(
                session_on("a", 2024, 6, 5),
                vec![
                    booking("c1", "a", 1, 50.0, CustomerStatus::Validated),
                    booking("c2", "a", 1, 70.0, CustomerStatus::Validated),
                ],
            ),
            details(
                archived_on("b", 2024, 6, 20),
                vec![booking("c3", "b", 4, 200.0, CustomerStatus::Validated)],
            ),
            details(
                session_on("c", 2024, 7, 1),
                vec![booking("c4", "c", 1, 30.0, CustomerStatus::Canceled)],
            ),
        ]
    }

    #[test]
    fn test_june_july_scenario() {
        let months = monthly_series(&june_july(), date(2024, 6, 10), false);

        let june = &months[5];
        assert_eq!((june.year, june.month), (2024, 6));
        assert_eq!(
            june.totals,
            BucketTotals {
                sessions: 1,
                clients: 2,
                revenue: 120.0,
            }
        );

        let july = &months[6];
        assert_eq!(
            july.totals,
            BucketTotals {
                sessions: 1,
                clients: 0,
                revenue: 0.0,
            }
        );

        let totals = StatsTotals::from_buckets(months.iter().map(|m| &m.totals));
        assert_eq!(totals.sessions, 2);
        assert_eq!(totals.revenue, 120.0);
    }

    #[test]
    fn test_calendar_year_series() {
        let months = monthly_series(&[], date(2024, 6, 10), false);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, "January 2024");
        assert_eq!(months[11].label, "December 2024");
    }

    #[test]
    fn test_forecast_wraps_into_next_year() {
        let items = vec![details(session_on("s1", 2025, 2, 14), vec![])];
        let months = monthly_series(&items, date(2024, 10, 3), true);

        assert_eq!((months[0].year, months[0].month), (2024, 10));
        assert_eq!((months[11].year, months[11].month), (2025, 9));
        assert_eq!(months[4].label, "February 2025");
        assert_eq!(months[4].totals.sessions, 1);
    }
}
