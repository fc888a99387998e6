//! Session read-model
//!
//! `SessionWithDetails` joins a session with its activity, spot and
//! bookings. It is never persisted and is rebuilt on every fetch.

use serde::{Deserialize, Serialize};

use super::{Activity, CustomerSession, Session};
use super::spot::Spot;

/// Session joined with its activity, spot and customer bookings.
///
/// `activity` and `spot` are `None` when the referenced record is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWithDetails {
    pub session: Session,
    pub activity: Option<Activity>,
    pub spot: Option<Spot>,
    #[serde(default)]
    pub customer_sessions: Vec<CustomerSession>,
}

/// Identity is the underlying session id only.
impl PartialEq for SessionWithDetails {
    fn eq(&self, other: &Self) -> bool {
        self.session.id == other.session.id
    }
}

impl SessionWithDetails {
    pub fn activity_name(&self) -> Option<&str> {
        self.activity.as_ref().map(|a| a.name.as_str())
    }

    pub fn spot_name(&self) -> Option<&str> {
        self.spot.as_ref().map(|s| s.name.as_str())
    }

    fn active_bookings(&self) -> impl Iterator<Item = &CustomerSession> {
        self.customer_sessions.iter().filter(|c| !c.is_canceled())
    }

    /// Revenue of the session: totals of non-cancelled bookings
    pub fn income(&self) -> f64 {
        self.active_bookings().map(|c| c.price_total).sum()
    }

    /// Participants across non-cancelled bookings
    pub fn clients(&self) -> u32 {
        self.active_bookings().map(|c| c.headcount()).sum()
    }

    pub fn waiting_count(&self) -> usize {
        self.customer_sessions.iter().filter(|c| c.is_waiting()).count()
    }

    pub fn has_cancelled_customer(&self) -> bool {
        self.customer_sessions.iter().any(|c| c.is_canceled())
    }

    pub fn remaining_places(&self) -> u32 {
        self.session.remaining_places()
    }
}

/// Waiting bookings across a collection of sessions
pub fn count_waiting(sessions: &[SessionWithDetails]) -> usize {
    sessions.iter().map(|s| s.waiting_count()).sum()
}
