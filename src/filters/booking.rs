//! Booking view: sessions grouped by calendar month
//!
//! Only months where at least one session has a booking are listed, and
//! pages count months rather than sessions.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use super::pagination::{page_slice, pagination_range, total_pages, PageSlot};
use super::period::{month_abbreviation, PeriodFilter};
use super::{filter_sessions, StatusFilter};
use crate::models::SessionWithDetails;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroup {
    pub year: i32,
    /// 1-based
    pub month: u32,
    pub label: String,
    pub sessions: Vec<SessionWithDetails>,
}

/// Group date-sorted sessions by (year, month), ascending.
///
/// Months without any booking are dropped; a kept month retains all of
/// its sessions.
pub fn group_by_month(sessions: &[SessionWithDetails]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for item in sessions {
        let (year, month) = (item.session.date.year(), item.session.date.month());
        match groups
            .iter_mut()
            .find(|g| g.year == year && g.month == month)
        {
            Some(group) => group.sessions.push(item.clone()),
            None => groups.push(MonthGroup {
                year,
                month,
                label: format!("{} {}", month_abbreviation(month), year),
                sessions: vec![item.clone()],
            }),
        }
    }

    groups.retain(|g| g.sessions.iter().any(|s| !s.customer_sessions.is_empty()));
    groups.sort_by_key(|g| (g.year, g.month));
    groups
}

/// Parameters of the booking view
#[derive(Debug, Clone)]
pub struct BookingQuery {
    pub period: PeriodFilter,
    pub search: String,
    pub page: usize,
    /// Months per page
    pub page_size: usize,
}

impl BookingQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            period: PeriodFilter::All,
            search: String::new(),
            page: 0,
            page_size,
        }
    }

    pub fn run(&self, items: &[SessionWithDetails], now: NaiveDateTime) -> BookingPage {
        let filtered = filter_sessions(items, &self.period, StatusFilter::All, &self.search, now);
        let months = group_by_month(&filtered);
        let total_pages = total_pages(months.len(), self.page_size);

        BookingPage {
            months: page_slice(&months, self.page, self.page_size).to_vec(),
            page: self.page,
            total_months: months.len(),
            total_pages,
            range: pagination_range(total_pages, self.page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub months: Vec<MonthGroup>,
    pub page: usize,
    pub total_months: usize,
    pub total_pages: usize,
    pub range: Vec<PageSlot>,
}
