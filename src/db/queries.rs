//! Database query implementations
//!
//! Contains functions for reading and writing activities, spots,
//! sessions and customer bookings.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DbError;
use crate::models::{Activity, CustomerSession, Session, Spot};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wrap a conversion failure so it surfaces through rusqlite's row mapping
fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(DbError::InvalidValue(message)),
    )
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| conversion_error(idx, e))
}

fn json_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e.to_string()))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| conversion_error(idx, format!("{}: {}", raw, e)))
}

// ============================================================================
// Activities
// ============================================================================

const ACTIVITY_COLUMNS: &str = "id, name, description, pricing_json, min_participants, \
     max_participants, min_age, duration, required_equipment";

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        pricing: json_column(row, 3)?,
        min_participants: row.get(4)?,
        max_participants: row.get(5)?,
        min_age: row.get(6)?,
        duration: row.get(7)?,
        required_equipment: row.get(8)?,
    })
}

/// Get all activities ordered by name
pub fn get_activities(conn: &Connection) -> Result<Vec<Activity>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM activities ORDER BY name",
        ACTIVITY_COLUMNS
    ))?;
    let activities = stmt
        .query_map([], activity_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(activities)
}

/// Get a single activity by ID
pub fn get_activity(conn: &Connection, id: &str) -> Result<Option<Activity>, DbError> {
    let activity = conn
        .query_row(
            &format!("SELECT {} FROM activities WHERE id = ?1", ACTIVITY_COLUMNS),
            params![id],
            activity_from_row,
        )
        .optional()?;
    Ok(activity)
}

/// Insert or replace an activity
pub fn upsert_activity(conn: &Connection, activity: &Activity) -> Result<(), DbError> {
    let pricing = serde_json::to_string(&activity.pricing)?;
    conn.execute(
        r#"
        INSERT INTO activities (
            id, name, description, pricing_json, min_participants,
            max_participants, min_age, duration, required_equipment
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            pricing_json = excluded.pricing_json,
            min_participants = excluded.min_participants,
            max_participants = excluded.max_participants,
            min_age = excluded.min_age,
            duration = excluded.duration,
            required_equipment = excluded.required_equipment
        "#,
        params![
            activity.id,
            activity.name,
            activity.description,
            pricing,
            activity.min_participants,
            activity.max_participants,
            activity.min_age,
            activity.duration,
            activity.required_equipment,
        ],
    )?;
    Ok(())
}

/// Delete an activity; returns whether a row was removed
pub fn delete_activity(conn: &Connection, id: &str) -> Result<bool, DbError> {
    let removed = conn.execute("DELETE FROM activities WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

// ============================================================================
// Spots
// ============================================================================

fn spot_from_row(row: &Row<'_>) -> rusqlite::Result<Spot> {
    Ok(Spot {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        gps_coordinates: row.get(3)?,
        meeting_point: row.get(4)?,
    })
}

/// Get all spots ordered by name
pub fn get_spots(conn: &Connection) -> Result<Vec<Spot>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, gps_coordinates, meeting_point FROM spots ORDER BY name",
    )?;
    let spots = stmt
        .query_map([], spot_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(spots)
}

/// Get a single spot by ID
pub fn get_spot(conn: &Connection, id: &str) -> Result<Option<Spot>, DbError> {
    let spot = conn
        .query_row(
            "SELECT id, name, description, gps_coordinates, meeting_point FROM spots WHERE id = ?1",
            params![id],
            spot_from_row,
        )
        .optional()?;
    Ok(spot)
}

/// Insert or replace a spot
pub fn upsert_spot(conn: &Connection, spot: &Spot) -> Result<(), DbError> {
    conn.execute(
        r#"
        INSERT INTO spots (id, name, description, gps_coordinates, meeting_point)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            gps_coordinates = excluded.gps_coordinates,
            meeting_point = excluded.meeting_point
        "#,
        params![
            spot.id,
            spot.name,
            spot.description,
            spot.gps_coordinates,
            spot.meeting_point,
        ],
    )?;
    Ok(())
}

/// Delete a spot; returns whether a row was removed
pub fn delete_spot(conn: &Connection, id: &str) -> Result<bool, DbError> {
    let removed = conn.execute("DELETE FROM spots WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

// ============================================================================
// Sessions
// ============================================================================

const SESSION_COLUMNS: &str = "id, date, start_time, end_time, places_max, places_reserved, \
     formula, status, activity_id, spot_id";

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        date: date_column(row, 1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        places_max: row.get(4)?,
        places_reserved: row.get(5)?,
        formula: parse_column(row, 6)?,
        status: parse_column(row, 7)?,
        activity: row.get(8)?,
        spot: row.get(9)?,
    })
}

/// Get all sessions in store order (date, then start time)
pub fn get_sessions(conn: &Connection) -> Result<Vec<Session>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM sessions ORDER BY date, start_time",
        SESSION_COLUMNS
    ))?;
    let sessions = stmt
        .query_map([], session_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sessions)
}

/// Get a single session by ID
pub fn get_session(conn: &Connection, id: &str) -> Result<Option<Session>, DbError> {
    let session = conn
        .query_row(
            &format!("SELECT {} FROM sessions WHERE id = ?1", SESSION_COLUMNS),
            params![id],
            session_from_row,
        )
        .optional()?;
    Ok(session)
}

/// Insert or replace a session
pub fn upsert_session(conn: &Connection, session: &Session) -> Result<(), DbError> {
    conn.execute(
        r#"
        INSERT INTO sessions (
            id, date, start_time, end_time, places_max, places_reserved,
            formula, status, activity_id, spot_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            start_time = excluded.start_time,
            end_time = excluded.end_time,
            places_max = excluded.places_max,
            places_reserved = excluded.places_reserved,
            formula = excluded.formula,
            status = excluded.status,
            activity_id = excluded.activity_id,
            spot_id = excluded.spot_id
        "#,
        params![
            session.id,
            session.date.format(DATE_FORMAT).to_string(),
            session.start_time,
            session.end_time,
            session.places_max,
            session.places_reserved,
            session.formula.as_str(),
            session.status.as_str(),
            session.activity,
            session.spot,
        ],
    )?;
    Ok(())
}

/// Overwrite the reserved place count of a session
pub fn set_places_reserved(conn: &Connection, id: &str, places: u32) -> Result<(), DbError> {
    conn.execute(
        "UPDATE sessions SET places_reserved = ?2 WHERE id = ?1",
        params![id, places],
    )?;
    Ok(())
}

/// Delete a session and, by cascade, its bookings
pub fn delete_session(conn: &Connection, id: &str) -> Result<bool, DbError> {
    let removed = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

/// Number of sessions referencing an activity
pub fn count_sessions_for_activity(conn: &Connection, activity_id: &str) -> Result<u32, DbError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sessions WHERE activity_id = ?1",
        params![activity_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Number of sessions referencing a spot
pub fn count_sessions_for_spot(conn: &Connection, spot_id: &str) -> Result<u32, DbError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sessions WHERE spot_id = ?1",
        params![spot_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ============================================================================
// Customer sessions
// ============================================================================

const CUSTOMER_COLUMNS: &str = "id, session_id, first_names, last_name, email, phone, \
     people_json, status, price_applicable, price_total";

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<CustomerSession> {
    Ok(CustomerSession {
        id: row.get(0)?,
        session_id: row.get(1)?,
        first_names: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        people_list: json_column(row, 6)?,
        status: parse_column(row, 7)?,
        price_applicable: row.get(8)?,
        price_total: row.get(9)?,
    })
}

/// Get every booking
pub fn get_customer_sessions(conn: &Connection) -> Result<Vec<CustomerSession>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM customer_sessions ORDER BY created_at, id",
        CUSTOMER_COLUMNS
    ))?;
    let bookings = stmt
        .query_map([], customer_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(bookings)
}

/// Get the bookings made against one session
pub fn get_customer_sessions_for(
    conn: &Connection,
    session_id: &str,
) -> Result<Vec<CustomerSession>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM customer_sessions WHERE session_id = ?1 ORDER BY created_at, id",
        CUSTOMER_COLUMNS
    ))?;
    let bookings = stmt
        .query_map(params![session_id], customer_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(bookings)
}

/// Get a single booking by ID
pub fn get_customer_session(
    conn: &Connection,
    id: &str,
) -> Result<Option<CustomerSession>, DbError> {
    let booking = conn
        .query_row(
            &format!("SELECT {} FROM customer_sessions WHERE id = ?1", CUSTOMER_COLUMNS),
            params![id],
            customer_from_row,
        )
        .optional()?;
    Ok(booking)
}

/// Insert or replace a booking
pub fn upsert_customer_session(
    conn: &Connection,
    booking: &CustomerSession,
) -> Result<(), DbError> {
    let people = serde_json::to_string(&booking.people_list)?;
    conn.execute(
        r#"
        INSERT INTO customer_sessions (
            id, session_id, first_names, last_name, email, phone,
            people_json, status, price_applicable, price_total
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(id) DO UPDATE SET
            session_id = excluded.session_id,
            first_names = excluded.first_names,
            last_name = excluded.last_name,
            email = excluded.email,
            phone = excluded.phone,
            people_json = excluded.people_json,
            status = excluded.status,
            price_applicable = excluded.price_applicable,
            price_total = excluded.price_total
        "#,
        params![
            booking.id,
            booking.session_id,
            booking.first_names,
            booking.last_name,
            booking.email,
            booking.phone,
            people,
            booking.status.as_str(),
            booking.price_applicable,
            booking.price_total,
        ],
    )?;
    Ok(())
}

/// Delete a booking; returns whether a row was removed
pub fn delete_customer_session(conn: &Connection, id: &str) -> Result<bool, DbError> {
    let removed = conn.execute("DELETE FROM customer_sessions WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use crate::fixtures::{activity, booking, session_on, spot};
    use crate::models::{CustomerStatus, PriceRow, SessionStatus};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_activity_roundtrip_keeps_pricing() {
        let conn = setup();
        let mut kayak = activity("a1", "Kayak");
        kayak.pricing = vec![PriceRow {
            category: "standard".into(),
            half_day: 35.0,
            full_day: 60.0,
        }];
        upsert_activity(&conn, &kayak).unwrap();

        let loaded = get_activity(&conn, "a1").unwrap().unwrap();
        assert_eq!(loaded, kayak);
        assert!(get_activity(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_session_replaces_existing() {
        let conn = setup();
        let mut session = session_on("s1", 2024, 6, 5);
        upsert_session(&conn, &session).unwrap();

        session.status = SessionStatus::Archived;
        upsert_session(&conn, &session).unwrap();

        let sessions = get_sessions(&conn).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status, SessionStatus::Archived);
    }

    #[test]
    fn test_sessions_ordered_by_date() {
        let conn = setup();
        upsert_session(&conn, &session_on("late", 2024, 7, 1)).unwrap();
        upsert_session(&conn, &session_on("early", 2024, 6, 1)).unwrap();

        let ids: Vec<String> = get_sessions(&conn).unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_bookings_filtered_by_session() {
        let conn = setup();
        upsert_session(&conn, &session_on("s1", 2024, 6, 5)).unwrap();
        upsert_session(&conn, &session_on("s2", 2024, 6, 6)).unwrap();
        upsert_customer_session(&conn, &booking("c1", "s1", 2, 50.0, CustomerStatus::Validated))
            .unwrap();
        upsert_customer_session(&conn, &booking("c2", "s2", 1, 30.0, CustomerStatus::Waiting))
            .unwrap();

        let for_s1 = get_customer_sessions_for(&conn, "s1").unwrap();
        assert_eq!(for_s1.len(), 1);
        assert_eq!(for_s1[0].people_list.len(), 2);
        assert_eq!(get_customer_sessions(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_session_cascades_to_bookings() {
        let conn = setup();
        upsert_session(&conn, &session_on("s1", 2024, 6, 5)).unwrap();
        upsert_customer_session(&conn, &booking("c1", "s1", 2, 50.0, CustomerStatus::Validated))
            .unwrap();

        assert!(delete_session(&conn, "s1").unwrap());
        assert!(get_customer_session(&conn, "c1").unwrap().is_none());
        assert!(!delete_session(&conn, "s1").unwrap());
    }

    #[test]
    fn test_reference_counts() {
        let conn = setup();
        upsert_spot(&conn, &spot("p1", "Calanques")).unwrap();
        upsert_session(&conn, &session_on("s1", 2024, 6, 5)).unwrap();

        assert_eq!(count_sessions_for_activity(&conn, "a1").unwrap(), 1);
        assert_eq!(count_sessions_for_spot(&conn, "p1").unwrap(), 1);
        assert_eq!(count_sessions_for_spot(&conn, "p2").unwrap(), 0);
    }

    #[test]
    fn test_corrupt_status_is_reported() {
        let conn = setup();
        conn.execute(
            "INSERT INTO sessions
                 (id, date, start_time, end_time, places_max, formula, status, activity_id, spot_id)
             VALUES ('s1', '2024-06-05', '09:00', '12:00', 8, 'half_day', 'Closed', 'a1', 'p1')",
            [],
        )
        .unwrap();

        assert!(get_sessions(&conn).is_err());
    }
}
