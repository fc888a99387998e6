//! CSV export functionality

use std::path::Path;

use csv::Writer;

use super::{ExportError, ExportableStat};

/// Write statistics rows with a header line
pub fn write_stats_csv(rows: &[ExportableStat], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    let mut writer = Writer::from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}
