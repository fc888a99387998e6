//! JSON export functionality
//!
//! Wraps a statistics series with export metadata and its totals.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{ExportError, ExportableStat, StatsKind};

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsExportSummary {
    pub total_sessions: u32,
    pub total_clients: u32,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsExportJson {
    pub export_date: String,
    pub export_version: &'static str,
    pub kind: StatsKind,
    pub rows: Vec<ExportableStat>,
    pub summary: StatsExportSummary,
}

impl StatsExportJson {
    pub fn new(kind: StatsKind, rows: &[ExportableStat]) -> Self {
        let summary = StatsExportSummary {
            total_sessions: rows.iter().map(|r| r.sessions).sum(),
            total_clients: rows.iter().map(|r| r.clients).sum(),
            total_revenue: rows.iter().map(|r| r.revenue).sum(),
        };
        Self {
            export_date: chrono::Utc::now().to_rfc3339(),
            export_version: EXPORT_VERSION,
            kind,
            rows: rows.to_vec(),
            summary,
        }
    }
}

/// Write a series as pretty-printed JSON
pub fn write_stats_json(
    kind: StatsKind,
    rows: &[ExportableStat],
    path: &Path,
) -> Result<(), ExportError> {
    let export = StatsExportJson::new(kind, rows);
    let json = serde_json::to_string_pretty(&export)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ExportableStat> {
        vec![
            ExportableStat {
                key: "2024-06".into(),
                label: "June 2024".into(),
                sessions: 1,
                clients: 2,
                revenue: 120.0,
                share: None,
            },
            ExportableStat {
                key: "2024-07".into(),
                label: "July 2024".into(),
                sessions: 1,
                clients: 0,
                revenue: 0.0,
                share: None,
            },
        ]
    }

    #[test]
    fn test_summary_totals() {
        let export = StatsExportJson::new(StatsKind::Monthly, &rows());
        assert_eq!(
            export.summary,
            StatsExportSummary {
                total_sessions: 2,
                total_clients: 2,
                total_revenue: 120.0,
            }
        );
        assert_eq!(export.export_version, EXPORT_VERSION);
    }

    #[test]
    fn test_write_stats_json() {
        let path = std::env::temp_dir().join("spotbook_test_stats.json");
        write_stats_json(StatsKind::Monthly, &rows(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["kind"], "monthly");
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert_eq!(value["rows"][0]["label"], "June 2024");
        assert_eq!(value["summary"]["total_revenue"], 120.0);

        std::fs::remove_file(&path).ok();
    }
}
