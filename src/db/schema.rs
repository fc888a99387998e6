//! Database schema definitions
//!
//! Contains SQL for creating all tables and indexes

use rusqlite::Connection;
use super::DbError;

/// SQL schema for all tables
const SCHEMA: &str = r#"
-- Activities offered by the operator
CREATE TABLE IF NOT EXISTS activities (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    pricing_json TEXT NOT NULL DEFAULT '[]',
    min_participants INTEGER NOT NULL DEFAULT 1,
    max_participants INTEGER NOT NULL DEFAULT 1,
    min_age INTEGER NOT NULL DEFAULT 0,
    duration TEXT NOT NULL DEFAULT '',
    required_equipment TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

-- Places where sessions happen
CREATE TABLE IF NOT EXISTS spots (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    gps_coordinates TEXT,
    meeting_point TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

-- Scheduled sessions; references are checked by the gateway
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    places_max INTEGER NOT NULL,
    places_reserved INTEGER NOT NULL DEFAULT 0,
    formula TEXT NOT NULL,
    status TEXT NOT NULL,
    activity_id TEXT NOT NULL,
    spot_id TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
CREATE INDEX IF NOT EXISTS idx_sessions_activity ON sessions(activity_id);
CREATE INDEX IF NOT EXISTS idx_sessions_spot ON sessions(spot_id);

-- Customer bookings against sessions
CREATE TABLE IF NOT EXISTS customer_sessions (
    id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    first_names TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    people_json TEXT NOT NULL DEFAULT '[]',
    status TEXT NOT NULL,
    price_applicable REAL NOT NULL DEFAULT 0.0,
    price_total REAL NOT NULL DEFAULT 0.0,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_customer_sessions_session ON customer_sessions(session_id);
"#;

/// Create all database tables
pub fn create_tables(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
