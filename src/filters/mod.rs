//! Filtering and pagination engine
//!
//! Derives display pages from a cached collection of sessions:
//! - Stable date sort
//! - Period, status and free-text filters
//! - Fixed-size pages with a compact navigation window
//!
//! The engine never clamps the requested page. Callers reset to page 0
//! whenever a filter or the search term changes.

pub mod booking;
pub mod pagination;
pub mod period;
pub mod search;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{SessionStatus, SessionWithDetails};

pub use booking::{group_by_month, BookingPage, BookingQuery, MonthGroup};
pub use pagination::{page_slice, pagination_range, total_pages, PageSlot};
pub use period::{quarter_windows, PeriodFilter, QuarterWindow};

/// Session status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SessionStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: SessionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Sort ascending by date; equal dates keep their relative order
pub fn sort_by_date(items: &[SessionWithDetails]) -> Vec<SessionWithDetails> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.session.date);
    sorted
}

/// Sort then apply the period, status and search filters
pub fn filter_sessions(
    items: &[SessionWithDetails],
    period: &PeriodFilter,
    status: StatusFilter,
    term: &str,
    now: NaiveDateTime,
) -> Vec<SessionWithDetails> {
    sort_by_date(items)
        .into_iter()
        .filter(|item| period.matches(item.session.date, now))
        .filter(|item| status.matches(item.session.status))
        .filter(|item| search::matches(item, term))
        .collect()
}

/// Parameters of the session list view
#[derive(Debug, Clone)]
pub struct SessionQuery {
    pub period: PeriodFilter,
    pub status: StatusFilter,
    pub search: String,
    pub page: usize,
    pub page_size: usize,
}

impl SessionQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            period: PeriodFilter::All,
            status: StatusFilter::All,
            search: String::new(),
            page: 0,
            page_size,
        }
    }

    pub fn run(&self, items: &[SessionWithDetails], now: NaiveDateTime) -> SessionPage {
        let filtered = filter_sessions(items, &self.period, self.status, &self.search, now);
        let total_pages = total_pages(filtered.len(), self.page_size);

        SessionPage {
            items: page_slice(&filtered, self.page, self.page_size).to_vec(),
            page: self.page,
            total_items: filtered.len(),
            total_pages,
            range: pagination_range(total_pages, self.page),
        }
    }
}

/// One page of the session list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub items: Vec<SessionWithDetails>,
    pub page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub range: Vec<PageSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{archived_on, date, details, session_on};

    fn now() -> NaiveDateTime {
        date(2024, 6, 5).and_hms_opt(10, 0, 0).unwrap()
    }

    fn sample() -> Vec<SessionWithDetails> {
        vec![
            details(session_on("late", 2024, 7, 1), vec![]),
            details(session_on("tie-a", 2024, 6, 5), vec![]),
            details(archived_on("early", 2024, 5, 1), vec![]),
            details(session_on("tie-b", 2024, 6, 5), vec![]),
        ]
    }

    fn ids(items: &[SessionWithDetails]) -> Vec<&str> {
        items.iter().map(|d| d.session.id.as_str()).collect()
    }

    #[test]
    fn test_noop_filter_returns_sorted_items() {
        let items = sample();
        let filtered = filter_sessions(&items, &PeriodFilter::All, StatusFilter::All, "", now());

        assert_eq!(ids(&filtered), vec!["early", "tie-a", "tie-b", "late"]);
        assert_eq!(filtered.len(), items.len());
    }

    #[test]
    fn test_status_filter() {
        let items = sample();
        let archived = StatusFilter::Only(SessionStatus::Archived);
        let filtered = filter_sessions(&items, &PeriodFilter::All, archived, "", now());
        assert_eq!(ids(&filtered), vec!["early"]);

        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Pending".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(SessionStatus::Pending)
        );
    }

    #[test]
    fn test_filters_combine() {
        let items = sample();
        let filtered = filter_sessions(
            &items,
            &PeriodFilter::ThisMonth,
            StatusFilter::Only(SessionStatus::Active),
            "kayak",
            now(),
        );
        assert_eq!(ids(&filtered), vec!["tie-a", "tie-b"]);
    }

    #[test]
    fn test_query_pages() {
        let items = sample();
        let mut query = SessionQuery::new(3);

        let first = query.run(&items, now());
        assert_eq!(first.total_items, 4);
        assert_eq!(first.total_pages, 2);
        assert_eq!(ids(&first.items), vec!["early", "tie-a", "tie-b"]);

        query.page = 1;
        let second = query.run(&items, now());
        assert_eq!(ids(&second.items), vec!["late"]);
        assert!(second.page < second.total_pages);
    }

    #[test]
    fn test_stale_page_is_not_clamped() {
        let items = sample();
        let mut query = SessionQuery::new(3);
        query.page = 4;
        query.period = PeriodFilter::Past;

        let page = query.run(&items, now());
        assert!(page.items.is_empty());
        assert_eq!(page.page, 4);
        assert_eq!(page.total_pages, 1);
    }
}
