//! Data models module
//!
//! Contains the booking records mirrored from the store:
//! - Sessions, activities and spots
//! - Customer bookings against sessions
//! - The joined `SessionWithDetails` read-model

pub mod activity;
pub mod customer;
pub mod details;
pub mod session;
pub mod spot;

pub use activity::{Activity, PriceRow};
pub use customer::{CustomerSession, CustomerStatus, Participant};
pub use details::{count_waiting, SessionWithDetails};
pub use session::{Formula, Session, SessionStatus};
pub use spot::Spot;

/// A record that carries a store identifier.
///
/// Cache stores key every replace/remove on this id.
pub trait Record: Clone + Send + Sync + 'static {
    fn record_id(&self) -> &str;
}

impl Record for Session {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Activity {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for Spot {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for CustomerSession {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Record for SessionWithDetails {
    fn record_id(&self) -> &str {
        &self.session.id
    }
}
