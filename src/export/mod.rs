//! Export payloads: XLSX workbook and raw-responses CSV

pub mod csv;
pub mod workbook;

pub use self::csv::responses_to_csv;
pub use workbook::{build_workbook, save_workbook, workbook_to_buffer, SheetNames};

use crate::config::ExportConfig;
use crate::AuditReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write the raw responses CSV to `path`
pub fn save_csv(report: &AuditReport, path: &Path) -> Result<()> {
    let csv = responses_to_csv(&report.responses)?;
    fs::write(path, csv).with_context(|| format!("Failed to write CSV: {}", path.display()))
}

/// Write the workbook and CSV into `dir` under the configured file names.
/// Returns the written paths, workbook first.
pub fn write_exports(
    report: &AuditReport,
    dir: &Path,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let workbook_path = dir.join(config.workbook_file());
    save_workbook(report, &SheetNames::from_config(&config.sheets), &workbook_path)?;
    debug!(path = %workbook_path.display(), "workbook written");

    let csv_path = dir.join(config.csv_file());
    save_csv(report, &csv_path)?;
    debug!(path = %csv_path.display(), "csv written");

    Ok(vec![workbook_path, csv_path])
}
