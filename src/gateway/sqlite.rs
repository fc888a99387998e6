//! SQLite-backed gateway
//!
//! Wraps the shared `Database` and enforces the booking rules that keep
//! `places_reserved` consistent with validated bookings.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::{BookingGateway, CollectionSource, GatewayError, GatewayResult};
use crate::aggregation;
use crate::db::{queries, Database};
use crate::models::{
    Activity, CustomerSession, CustomerStatus, Session, SessionWithDetails, Spot,
};

/// Gateway over the local SQLite store
#[derive(Clone)]
pub struct SqliteGateway {
    db: Arc<Database>,
}

impl SqliteGateway {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Log the feedback of a failed operation before handing it back
fn logged<T>(operation: &str, result: GatewayResult<T>) -> GatewayResult<T> {
    if let Err(e) = &result {
        warn!("{} failed: {} ({})", operation, e.feedback(), e);
    }
    result
}

fn require_session(conn: &Connection, id: &str) -> GatewayResult<Session> {
    queries::get_session(conn, id)?.ok_or_else(|| GatewayError::not_found("session", id))
}

fn require_booking(conn: &Connection, id: &str) -> GatewayResult<CustomerSession> {
    queries::get_customer_session(conn, id)?
        .ok_or_else(|| GatewayError::not_found("booking", id))
}

/// Places a booking holds on its session
fn reserved_by(booking: &CustomerSession) -> u32 {
    if booking.status == CustomerStatus::Validated {
        booking.headcount()
    } else {
        0
    }
}

// ============================================================================
// Booking rules
// ============================================================================

/// Store a new booking: validated if it fits, waitlisted otherwise
fn book(conn: &Connection, mut booking: CustomerSession) -> GatewayResult<CustomerSession> {
    if queries::get_customer_session(conn, &booking.id)?.is_some() {
        return Err(GatewayError::Rejected(format!(
            "Booking {} already exists",
            booking.id
        )));
    }
    let session = require_session(conn, &booking.session_id)?;

    if booking.headcount() <= session.remaining_places() {
        booking.status = CustomerStatus::Validated;
        queries::set_places_reserved(
            conn,
            &session.id,
            session.places_reserved + booking.headcount(),
        )?;
    } else {
        booking.status = CustomerStatus::Waiting;
    }

    queries::upsert_customer_session(conn, &booking)?;
    Ok(booking)
}

/// Replace a booking, moving its places if its validated headcount changed
fn rebook(
    conn: &Connection,
    id: &str,
    mut booking: CustomerSession,
) -> GatewayResult<CustomerSession> {
    let existing = require_booking(conn, id)?;
    booking.id = existing.id.clone();
    booking.session_id = existing.session_id.clone();

    let session = require_session(conn, &existing.session_id)?;
    let released = session.places_reserved.saturating_sub(reserved_by(&existing));
    let needed = reserved_by(&booking);
    if released + needed > session.places_max {
        return Err(GatewayError::Rejected(format!(
            "Only {} places left on this session",
            session.places_max.saturating_sub(released)
        )));
    }

    queries::set_places_reserved(conn, &session.id, released + needed)?;
    queries::upsert_customer_session(conn, &booking)?;
    Ok(booking)
}

/// Cancel a booking and give its places back
fn cancel(conn: &Connection, id: &str) -> GatewayResult<CustomerSession> {
    let mut booking = require_booking(conn, id)?;
    if booking.is_canceled() {
        return Ok(booking);
    }

    let held = reserved_by(&booking);
    if held > 0 {
        let session = require_session(conn, &booking.session_id)?;
        queries::set_places_reserved(
            conn,
            &session.id,
            session.places_reserved.saturating_sub(held),
        )?;
    }

    booking.status = CustomerStatus::Canceled;
    queries::upsert_customer_session(conn, &booking)?;
    Ok(booking)
}

fn unbook(conn: &Connection, id: &str) -> GatewayResult<()> {
    let booking = require_booking(conn, id)?;
    let held = reserved_by(&booking);
    if held > 0 {
        if let Some(session) = queries::get_session(conn, &booking.session_id)? {
            queries::set_places_reserved(
                conn,
                &session.id,
                session.places_reserved.saturating_sub(held),
            )?;
        }
    }
    queries::delete_customer_session(conn, id)?;
    Ok(())
}

// ============================================================================
// Gateway implementation
// ============================================================================

#[async_trait]
impl BookingGateway for SqliteGateway {
    async fn fetch_sessions(&self) -> GatewayResult<Vec<Session>> {
        let result = self
            .db
            .with_connection(queries::get_sessions)
            .map_err(GatewayError::from);
        if let Ok(sessions) = &result {
            debug!("Fetched {} sessions", sessions.len());
        }
        logged("fetch_sessions", result)
    }

    async fn get_session_by_id(&self, id: &str) -> GatewayResult<Session> {
        let result = self
            .db
            .with_connection(|conn| queries::get_session(conn, id))
            .map_err(GatewayError::from)
            .and_then(|found| found.ok_or_else(|| GatewayError::not_found("session", id)));
        logged("get_session_by_id", result)
    }

    async fn create_session(&self, session: Session) -> GatewayResult<Session> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            if queries::get_session(conn, &session.id)?.is_some() {
                return Err(GatewayError::Rejected(format!(
                    "Session {} already exists",
                    session.id
                )));
            }
            if session.places_reserved > session.places_max {
                return Err(GatewayError::Rejected(
                    "Reserved places exceed the session capacity".to_string(),
                ));
            }
            queries::upsert_session(conn, &session)?;
            Ok(session)
        });
        if let Ok(created) = &result {
            info!("Created session {} on {}", created.id, created.date);
        }
        logged("create_session", result)
    }

    async fn update_session(&self, id: &str, mut session: Session) -> GatewayResult<Session> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            let existing = require_session(conn, id)?;
            session.id = existing.id;
            // Reservations are owned by the booking rules
            session.places_reserved = existing.places_reserved;
            if session.places_max < session.places_reserved {
                return Err(GatewayError::Rejected(format!(
                    "Capacity cannot drop below the {} places already reserved",
                    session.places_reserved
                )));
            }
            queries::upsert_session(conn, &session)?;
            Ok(session)
        });
        logged("update_session", result)
    }

    async fn delete_session(&self, id: &str) -> GatewayResult<()> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            if !queries::delete_session(conn, id)? {
                return Err(GatewayError::not_found("session", id));
            }
            Ok(())
        });
        if result.is_ok() {
            info!("Deleted session {} and its bookings", id);
        }
        logged("delete_session", result)
    }

    async fn fetch_activities(&self) -> GatewayResult<Vec<Activity>> {
        let result = self
            .db
            .with_connection(queries::get_activities)
            .map_err(GatewayError::from);
        logged("fetch_activities", result)
    }

    async fn get_activity_by_id(&self, id: &str) -> GatewayResult<Activity> {
        let result = self
            .db
            .with_connection(|conn| queries::get_activity(conn, id))
            .map_err(GatewayError::from)
            .and_then(|found| found.ok_or_else(|| GatewayError::not_found("activity", id)));
        logged("get_activity_by_id", result)
    }

    async fn create_activity(&self, activity: Activity) -> GatewayResult<Activity> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            if queries::get_activity(conn, &activity.id)?.is_some() {
                return Err(GatewayError::Rejected(format!(
                    "Activity {} already exists",
                    activity.id
                )));
            }
            queries::upsert_activity(conn, &activity)?;
            Ok(activity)
        });
        logged("create_activity", result)
    }

    async fn update_activity(&self, id: &str, mut activity: Activity) -> GatewayResult<Activity> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            if queries::get_activity(conn, id)?.is_none() {
                return Err(GatewayError::not_found("activity", id));
            }
            activity.id = id.to_string();
            queries::upsert_activity(conn, &activity)?;
            Ok(activity)
        });
        logged("update_activity", result)
    }

    async fn delete_activity(&self, id: &str) -> GatewayResult<()> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            let used_by = queries::count_sessions_for_activity(conn, id)?;
            if used_by > 0 {
                return Err(GatewayError::Rejected(format!(
                    "Activity is still used by {} sessions",
                    used_by
                )));
            }
            if !queries::delete_activity(conn, id)? {
                return Err(GatewayError::not_found("activity", id));
            }
            Ok(())
        });
        logged("delete_activity", result)
    }

    async fn fetch_spots(&self) -> GatewayResult<Vec<Spot>> {
        let result = self
            .db
            .with_connection(queries::get_spots)
            .map_err(GatewayError::from);
        logged("fetch_spots", result)
    }

    async fn get_spot_by_id(&self, id: &str) -> GatewayResult<Spot> {
        let result = self
            .db
            .with_connection(|conn| queries::get_spot(conn, id))
            .map_err(GatewayError::from)
            .and_then(|found| found.ok_or_else(|| GatewayError::not_found("spot", id)));
        logged("get_spot_by_id", result)
    }

    async fn create_spot(&self, spot: Spot) -> GatewayResult<Spot> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            if queries::get_spot(conn, &spot.id)?.is_some() {
                return Err(GatewayError::Rejected(format!(
                    "Spot {} already exists",
                    spot.id
                )));
            }
            queries::upsert_spot(conn, &spot)?;
            Ok(spot)
        });
        logged("create_spot", result)
    }

    async fn update_spot(&self, id: &str, mut spot: Spot) -> GatewayResult<Spot> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            if queries::get_spot(conn, id)?.is_none() {
                return Err(GatewayError::not_found("spot", id));
            }
            spot.id = id.to_string();
            queries::upsert_spot(conn, &spot)?;
            Ok(spot)
        });
        logged("update_spot", result)
    }

    async fn delete_spot(&self, id: &str) -> GatewayResult<()> {
        let result = self.db.with_transaction(|conn| -> GatewayResult<_> {
            let used_by = queries::count_sessions_for_spot(conn, id)?;
            if used_by > 0 {
                return Err(GatewayError::Rejected(format!(
                    "Spot is still used by {} sessions",
                    used_by
                )));
            }
            if !queries::delete_spot(conn, id)? {
                return Err(GatewayError::not_found("spot", id));
            }
            Ok(())
        });
        logged("delete_spot", result)
    }

    async fn fetch_customer_sessions(&self) -> GatewayResult<Vec<CustomerSession>> {
        let result = self
            .db
            .with_connection(queries::get_customer_sessions)
            .map_err(GatewayError::from);
        logged("fetch_customer_sessions", result)
    }

    async fn get_customer_session_by_id(&self, id: &str) -> GatewayResult<CustomerSession> {
        let result = self
            .db
            .with_connection(|conn| queries::get_customer_session(conn, id))
            .map_err(GatewayError::from)
            .and_then(|found| found.ok_or_else(|| GatewayError::not_found("booking", id)));
        logged("get_customer_session_by_id", result)
    }

    async fn customer_sessions_for(
        &self,
        session_id: &str,
    ) -> GatewayResult<Vec<CustomerSession>> {
        let result = self
            .db
            .with_connection(|conn| queries::get_customer_sessions_for(conn, session_id))
            .map_err(GatewayError::from);
        logged("customer_sessions_for", result)
    }

    async fn create_customer_session(
        &self,
        booking: CustomerSession,
    ) -> GatewayResult<CustomerSession> {
        let result = self.db.with_transaction(|conn| book(conn, booking));
        if let Ok(stored) = &result {
            info!(
                "Booking {} on session {} stored as {}",
                stored.id, stored.session_id, stored.status
            );
        }
        logged("create_customer_session", result)
    }

    async fn update_customer_session(
        &self,
        id: &str,
        booking: CustomerSession,
    ) -> GatewayResult<CustomerSession> {
        let result = self.db.with_transaction(|conn| rebook(conn, id, booking));
        logged("update_customer_session", result)
    }

    async fn cancel_customer_session(&self, id: &str) -> GatewayResult<CustomerSession> {
        let result = self.db.with_transaction(|conn| cancel(conn, id));
        if result.is_ok() {
            info!("Booking {} canceled", id);
        }
        logged("cancel_customer_session", result)
    }

    async fn delete_customer_session(&self, id: &str) -> GatewayResult<()> {
        let result = self.db.with_transaction(|conn| unbook(conn, id));
        logged("delete_customer_session", result)
    }
}

// ============================================================================
// Cache sources
// ============================================================================

#[async_trait]
impl CollectionSource<Session> for SqliteGateway {
    async fn fetch_all(&self) -> GatewayResult<Vec<Session>> {
        self.fetch_sessions().await
    }
}

#[async_trait]
impl CollectionSource<Activity> for SqliteGateway {
    async fn fetch_all(&self) -> GatewayResult<Vec<Activity>> {
        self.fetch_activities().await
    }
}

#[async_trait]
impl CollectionSource<Spot> for SqliteGateway {
    async fn fetch_all(&self) -> GatewayResult<Vec<Spot>> {
        self.fetch_spots().await
    }
}

#[async_trait]
impl CollectionSource<CustomerSession> for SqliteGateway {
    async fn fetch_all(&self) -> GatewayResult<Vec<CustomerSession>> {
        self.fetch_customer_sessions().await
    }
}

#[async_trait]
impl CollectionSource<SessionWithDetails> for SqliteGateway {
    async fn fetch_all(&self) -> GatewayResult<Vec<SessionWithDetails>> {
        aggregation::aggregate_all(self).await
    }
}
