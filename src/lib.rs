//! Spotbook - booking core for outdoor-activity operators
//!
//! This library keeps staff dashboards in sync with the booking store.
//! It handles:
//! - SQLite persistence and the booking gateway
//! - Cached entity collections with a staleness window
//! - Session read-models joined with activity, spot and bookings
//! - Filtering and pagination of session and booking views
//! - Revenue statistics and their CSV/JSON export

pub mod aggregation;
pub mod config;
pub mod db;
pub mod export;
pub mod filters;
pub mod gateway;
pub mod models;
pub mod stats;
pub mod store;

#[cfg(test)]
mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use config::{AppConfig, ConfigError};
use db::{Database, DbError};
use export::{ExportError, ExportFormat, ExportableStat, StatsKind};
use filters::{BookingPage, BookingQuery, SessionPage, SessionQuery};
use gateway::{BookingGateway, GatewayError, SqliteGateway};
use models::{count_waiting, CustomerSession};
use stats::{BreakdownEntry, MonthlyStat, StatsTotals};
use store::{FetchOutcome, Stores};

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dashboard figures derived from the cached sessions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub generated_for: NaiveDate,
    pub totals: StatsTotals,
    pub monthly: Vec<MonthlyStat>,
    pub activities: Vec<BreakdownEntry>,
    pub spots: Vec<BreakdownEntry>,
    pub waiting_customers: usize,
}

/// Everything one staff session works with
pub struct AppState {
    pub config: AppConfig,
    pub gateway: SqliteGateway,
    pub stores: Stores,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        let stores = Stores::from_config(&config);
        Self {
            config,
            gateway: SqliteGateway::new(Arc::new(db)),
            stores,
        }
    }

    /// Refresh the session read-models if stale
    pub async fn refresh_sessions(&self) -> FetchOutcome {
        self.stores.session_details.fetch(&self.gateway).await
    }

    /// Session list page for a viewport class
    pub fn session_page(
        &self,
        mut query: SessionQuery,
        wide: bool,
        now: NaiveDateTime,
    ) -> SessionPage {
        query.page_size = self.config.page_sizes.sessions(wide);
        query.run(&self.stores.session_details.snapshot(), now)
    }

    /// Booking view page, paginated by month
    pub fn booking_page(&self, mut query: BookingQuery, now: NaiveDateTime) -> BookingPage {
        query.page_size = self.config.page_sizes.booking_months;
        query.run(&self.stores.session_details.snapshot(), now)
    }

    /// Book a customer; the session read-models are refetched on next refresh
    pub async fn book(&self, booking: CustomerSession) -> Result<CustomerSession, AppError> {
        let stored = self.gateway.create_customer_session(booking).await?;
        self.stores.customer_sessions.add(stored.clone());
        self.stores.session_details.invalidate();
        Ok(stored)
    }

    /// Cancel a booking and release its places
    pub async fn cancel_booking(&self, id: &str) -> Result<CustomerSession, AppError> {
        let canceled = self.gateway.cancel_customer_session(id).await?;
        self.stores.customer_sessions.update(canceled.clone());
        self.stores.session_details.invalidate();
        Ok(canceled)
    }

    pub fn dashboard_summary(&self, today: NaiveDate, forecast: bool) -> DashboardSummary {
        let sessions = self.stores.session_details.snapshot();
        let monthly = stats::monthly_series(&sessions, today, forecast);

        DashboardSummary {
            generated_for: today,
            totals: StatsTotals::from_buckets(monthly.iter().map(|m| &m.totals)),
            activities: stats::by_activity(&sessions),
            spots: stats::by_spot(&sessions),
            waiting_customers: count_waiting(&sessions),
            monthly,
        }
    }

    /// Export one statistics series from the cached sessions.
    ///
    /// Without `dir` the file goes to the user's download folder.
    pub fn export_stats(
        &self,
        kind: StatsKind,
        format: ExportFormat,
        dir: Option<&Path>,
        today: NaiveDate,
        forecast: bool,
    ) -> Result<PathBuf, AppError> {
        let sessions = self.stores.session_details.snapshot();
        let rows: Vec<ExportableStat> = match kind {
            StatsKind::Daily => stats::daily_series(&sessions, today, forecast)
                .iter()
                .map(ExportableStat::from)
                .collect(),
            StatsKind::Monthly => stats::monthly_series(&sessions, today, forecast)
                .iter()
                .map(ExportableStat::from)
                .collect(),
            StatsKind::Activities => stats::by_activity(&sessions)
                .iter()
                .map(ExportableStat::from)
                .collect(),
            StatsKind::Spots => stats::by_spot(&sessions)
                .iter()
                .map(ExportableStat::from)
                .collect(),
        };
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(export::get_export_directory);
        Ok(export::export_stats(kind, &rows, format, &dir)?)
    }

    /// Drop all cached data (logout)
    pub fn logout(&self) {
        self.stores.reset();
    }
}

// ============================================================================
// Application Setup
// ============================================================================

pub async fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_max_level(config.max_log_level()?)
        .init();

    tracing::info!("Starting spotbook");
    tracing::info!("Database path: {:?}", config.db_path);

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(config.db_path.clone())?;
    database.initialize()?;
    tracing::info!("Database initialized successfully");

    let state = AppState::new(config, database);

    if let FetchOutcome::Failed(feedback) = state.refresh_sessions().await {
        tracing::error!("Could not load sessions: {}", feedback);
    }

    let today = chrono::Local::now().date_naive();
    let summary = state.dashboard_summary(today, false);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
