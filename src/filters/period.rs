//! Temporal filters
//!
//! Boundaries use calendar-local semantics relative to an explicit "now":
//! weeks run Sunday through Saturday, months and quarters follow calendar
//! month boundaries.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter English month name for a 1-based month
pub fn month_abbreviation(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS[((month.max(1) - 1) % 12) as usize]
}

/// A calendar quarter, e.g. "Oct-Dec 2026"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterWindow {
    pub year: i32,
    /// 1-based first month
    pub start_month: u32,
    /// 1-based last month
    pub end_month: u32,
    pub label: String,
}

impl QuarterWindow {
    /// Quarter that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        let index = (date.month0() / 3) as i32;
        Self::from_index(date.year(), index)
    }

    /// `index` counts quarters from Q1 of `year` and may exceed 3
    fn from_index(year: i32, index: i32) -> Self {
        let year = year + index.div_euclid(4);
        let start_month = (index.rem_euclid(4) * 3 + 1) as u32;
        let end_month = start_month + 2;
        Self {
            year,
            start_month,
            end_month,
            label: format!(
                "{}-{} {}",
                month_abbreviation(start_month),
                month_abbreviation(end_month),
                year
            ),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && (self.start_month..=self.end_month).contains(&date.month())
    }
}

/// The quarter containing `today` and the three that follow
pub fn quarter_windows(today: NaiveDate) -> Vec<QuarterWindow> {
    let current = (today.month0() / 3) as i32;
    (0..4)
        .map(|offset| QuarterWindow::from_index(today.year(), current + offset))
        .collect()
}

/// First and last day of the Sunday-based week containing `today`
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    (start, start + Duration::days(6))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PeriodFilter {
    #[default]
    All,
    ThisWeek,
    ThisMonth,
    ThisQuarter,
    /// A specific quarter picked from `quarter_windows`
    Quarter(QuarterWindow),
    /// Sessions whose day started before now
    Past,
}

impl PeriodFilter {
    /// Parse a fixed tag or, failing that, a quarter label valid at `today`
    pub fn from_tag(tag: &str, today: NaiveDate) -> Option<Self> {
        tag.parse().ok().or_else(|| {
            quarter_windows(today)
                .into_iter()
                .find(|quarter| quarter.label == tag)
                .map(PeriodFilter::Quarter)
        })
    }

    pub fn matches(&self, date: NaiveDate, now: NaiveDateTime) -> bool {
        let today = now.date();
        match self {
            PeriodFilter::All => true,
            PeriodFilter::ThisWeek => {
                let (start, end) = week_bounds(today);
                start <= date && date <= end
            }
            PeriodFilter::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            PeriodFilter::ThisQuarter => QuarterWindow::containing(today).contains(date),
            PeriodFilter::Quarter(quarter) => quarter.contains(date),
            PeriodFilter::Past => date.and_time(chrono::NaiveTime::MIN) < now,
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PeriodFilter::All),
            "thisWeek" => Ok(PeriodFilter::ThisWeek),
            "thisMonth" => Ok(PeriodFilter::ThisMonth),
            "thisQuarter" => Ok(PeriodFilter::ThisQuarter),
            "past" => Ok(PeriodFilter::Past),
            other => Err(format!("unknown period filter: {}", other)),
        }
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::All => f.write_str("all"),
            PeriodFilter::ThisWeek => f.write_str("thisWeek"),
            PeriodFilter::ThisMonth => f.write_str("thisMonth"),
            PeriodFilter::ThisQuarter => f.write_str("thisQuarter"),
            PeriodFilter::Quarter(quarter) => f.write_str(&quarter.label),
            PeriodFilter::Past => f.write_str("past"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::date;

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_week_runs_sunday_to_saturday() {
        // Wednesday 2024-06-05
        let (start, end) = week_bounds(date(2024, 6, 5));
        assert_eq!(start, date(2024, 6, 2));
        assert_eq!(end, date(2024, 6, 8));

        // A Sunday starts its own week
        assert_eq!(week_bounds(date(2024, 6, 9)).0, date(2024, 6, 9));
    }

    #[test]
    fn test_this_week_filter() {
        let now = noon(2024, 6, 5);
        assert!(PeriodFilter::ThisWeek.matches(date(2024, 6, 2), now));
        assert!(PeriodFilter::ThisWeek.matches(date(2024, 6, 8), now));
        assert!(!PeriodFilter::ThisWeek.matches(date(2024, 6, 9), now));
        assert!(!PeriodFilter::ThisWeek.matches(date(2024, 6, 1), now));
    }

    #[test]
    fn test_this_month_and_quarter() {
        let now = noon(2024, 5, 20);
        assert!(PeriodFilter::ThisMonth.matches(date(2024, 5, 1), now));
        assert!(!PeriodFilter::ThisMonth.matches(date(2023, 5, 20), now));
        assert!(PeriodFilter::ThisQuarter.matches(date(2024, 4, 1), now));
        assert!(PeriodFilter::ThisQuarter.matches(date(2024, 6, 30), now));
        assert!(!PeriodFilter::ThisQuarter.matches(date(2024, 7, 1), now));
    }

    #[test]
    fn test_past_compares_start_of_day() {
        let now = noon(2024, 6, 5);
        assert!(PeriodFilter::Past.matches(date(2024, 6, 5), now));
        assert!(PeriodFilter::Past.matches(date(2024, 6, 4), now));
        assert!(!PeriodFilter::Past.matches(date(2024, 6, 6), now));

        let midnight = date(2024, 6, 5).and_hms_opt(0, 0, 0).unwrap();
        assert!(!PeriodFilter::Past.matches(date(2024, 6, 5), midnight));
    }

    #[test]
    fn test_quarter_windows_wrap_year() {
        let quarters = quarter_windows(date(2026, 10, 18));
        let labels: Vec<&str> = quarters.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Oct-Dec 2026", "Jan-Mar 2027", "Apr-Jun 2027", "Jul-Sep 2027"]
        );
        assert!(quarters[1].contains(date(2027, 2, 14)));
        assert!(!quarters[1].contains(date(2026, 2, 14)));
    }

    #[test]
    fn test_from_tag() {
        let today = date(2026, 10, 18);
        assert_eq!(PeriodFilter::from_tag("past", today), Some(PeriodFilter::Past));
        assert!(matches!(
            PeriodFilter::from_tag("Jan-Mar 2027", today),
            Some(PeriodFilter::Quarter(q)) if q.year == 2027 && q.start_month == 1
        ));
        assert_eq!(PeriodFilter::from_tag("Jan-Mar 2020", today), None);
        assert_eq!(PeriodFilter::from_tag("nextYear", today), None);
    }
}
