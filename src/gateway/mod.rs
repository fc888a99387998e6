//! Remote data gateway
//!
//! The gateway is the only path to canonical records:
//! - Fetch, create, update and delete per entity
//! - Booking rules (waitlist, place accounting) on customer sessions
//! - `CollectionSource`, the fetch-all seam consumed by cache stores

pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::DbError;
use crate::models::{Activity, CustomerSession, Session, Spot};

pub use sqlite::SqliteGateway;

/// Gateway failures
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        GatewayError::NotFound { kind, id: id.into() }
    }

    /// Message suitable for showing to staff
    pub fn feedback(&self) -> String {
        match self {
            GatewayError::Database(_) => {
                "The booking store is unavailable, please try again".to_string()
            }
            GatewayError::NotFound { kind, .. } => format!("This {} no longer exists", kind),
            GatewayError::Rejected(reason) => reason.clone(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Canonical operations on booking records
#[async_trait]
pub trait BookingGateway: Send + Sync {
    // Sessions
    async fn fetch_sessions(&self) -> GatewayResult<Vec<Session>>;
    async fn get_session_by_id(&self, id: &str) -> GatewayResult<Session>;
    async fn create_session(&self, session: Session) -> GatewayResult<Session>;
    async fn update_session(&self, id: &str, session: Session) -> GatewayResult<Session>;
    async fn delete_session(&self, id: &str) -> GatewayResult<()>;

    // Activities
    async fn fetch_activities(&self) -> GatewayResult<Vec<Activity>>;
    async fn get_activity_by_id(&self, id: &str) -> GatewayResult<Activity>;
    async fn create_activity(&self, activity: Activity) -> GatewayResult<Activity>;
    async fn update_activity(&self, id: &str, activity: Activity) -> GatewayResult<Activity>;
    async fn delete_activity(&self, id: &str) -> GatewayResult<()>;

    // Spots
    async fn fetch_spots(&self) -> GatewayResult<Vec<Spot>>;
    async fn get_spot_by_id(&self, id: &str) -> GatewayResult<Spot>;
    async fn create_spot(&self, spot: Spot) -> GatewayResult<Spot>;
    async fn update_spot(&self, id: &str, spot: Spot) -> GatewayResult<Spot>;
    async fn delete_spot(&self, id: &str) -> GatewayResult<()>;

    // Customer sessions
    async fn fetch_customer_sessions(&self) -> GatewayResult<Vec<CustomerSession>>;
    async fn get_customer_session_by_id(&self, id: &str) -> GatewayResult<CustomerSession>;
    async fn customer_sessions_for(&self, session_id: &str)
        -> GatewayResult<Vec<CustomerSession>>;
    async fn create_customer_session(
        &self,
        booking: CustomerSession,
    ) -> GatewayResult<CustomerSession>;
    async fn update_customer_session(
        &self,
        id: &str,
        booking: CustomerSession,
    ) -> GatewayResult<CustomerSession>;
    async fn cancel_customer_session(&self, id: &str) -> GatewayResult<CustomerSession>;
    async fn delete_customer_session(&self, id: &str) -> GatewayResult<()>;
}

/// Something a cache store can refill itself from
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    async fn fetch_all(&self) -> GatewayResult<Vec<T>>;
}
