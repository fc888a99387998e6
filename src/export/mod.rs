//! Export module for CSV and JSON export functionality
//!
//! Writes statistics series (daily, monthly, activity and spot
//! breakdowns) to timestamped files.

pub mod csv_export;
pub mod json_export;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::stats::{BreakdownEntry, DailyStat, MonthlyStat};

pub use csv_export::write_stats_csv;
pub use json_export::{write_stats_json, StatsExportJson};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid export format: {0}. Use 'csv' or 'json'")]
    InvalidFormat(String),
}

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::InvalidFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Which series a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsKind {
    Daily,
    Monthly,
    Activities,
    Spots,
}

impl fmt::Display for StatsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatsKind::Daily => "daily",
            StatsKind::Monthly => "monthly",
            StatsKind::Activities => "activities",
            StatsKind::Spots => "spots",
        };
        f.write_str(name)
    }
}

/// Flat statistics row shared by every series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportableStat {
    /// Date, month or group name
    pub key: String,
    pub label: String,
    pub sessions: u32,
    pub clients: u32,
    pub revenue: f64,
    /// Percentage of sessions, breakdowns only
    pub share: Option<f64>,
}

impl From<&DailyStat> for ExportableStat {
    fn from(day: &DailyStat) -> Self {
        Self {
            key: day.date.format("%Y-%m-%d").to_string(),
            label: day.label.clone(),
            sessions: day.totals.sessions,
            clients: day.totals.clients,
            revenue: day.totals.revenue,
            share: None,
        }
    }
}

impl From<&MonthlyStat> for ExportableStat {
    fn from(month: &MonthlyStat) -> Self {
        Self {
            key: format!("{}-{:02}", month.year, month.month),
            label: month.label.clone(),
            sessions: month.totals.sessions,
            clients: month.totals.clients,
            revenue: month.totals.revenue,
            share: None,
        }
    }
}

impl From<&BreakdownEntry> for ExportableStat {
    fn from(entry: &BreakdownEntry) -> Self {
        Self {
            key: entry.name.clone(),
            label: entry.name.clone(),
            sessions: entry.totals.sessions,
            clients: entry.totals.clients,
            revenue: entry.totals.revenue,
            share: Some(entry.share),
        }
    }
}

/// Get the default export directory (Downloads folder or temp dir)
pub fn get_export_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::document_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// Generate a timestamped filename for exports
pub fn generate_export_filename(prefix: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

/// Write a series into `dir` and return the file path
pub fn export_stats(
    kind: StatsKind,
    rows: &[ExportableStat],
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let prefix = format!("spotbook_{}", kind);
    let path = dir.join(generate_export_filename(&prefix, format.extension()));

    match format {
        ExportFormat::Csv => write_stats_csv(rows, &path)?,
        ExportFormat::Json => write_stats_json(kind, rows, &path)?,
    }

    info!("Exported {} {} rows to {:?}", rows.len(), kind, path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::date;
    use crate::stats::BucketTotals;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_generate_export_filename() {
        let filename = generate_export_filename("spotbook_monthly", "csv");
        assert!(filename.starts_with("spotbook_monthly_"));
        assert!(filename.ends_with(".csv"));
    }

    #[test]
    fn test_rows_from_series() {
        let mut day = DailyStat::new(date(2024, 6, 5));
        day.totals = BucketTotals {
            sessions: 2,
            clients: 3,
            revenue: 90.0,
        };
        let row = ExportableStat::from(&day);
        assert_eq!(row.key, "2024-06-05");
        assert_eq!(row.label, "5");
        assert_eq!(row.clients, 3);
        assert!(row.share.is_none());

        let entry = BreakdownEntry {
            name: "Kayak".into(),
            totals: BucketTotals {
                sessions: 1,
                clients: 0,
                revenue: 0.0,
            },
            share: 25.0,
        };
        assert_eq!(ExportableStat::from(&entry).share, Some(25.0));
    }

    #[test]
    fn test_export_stats_writes_file() {
        let dir = std::env::temp_dir().join("spotbook_export_test");
        let rows = vec![ExportableStat {
            key: "2024-06".into(),
            label: "June 2024".into(),
            sessions: 1,
            clients: 2,
            revenue: 120.0,
            share: None,
        }];

        let path = export_stats(StatsKind::Monthly, &rows, ExportFormat::Json, &dir).unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "json");

        std::fs::remove_file(&path).ok();
    }
}
