//! Config schema and deserialization

use crate::{AuditError, Thresholds};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WORKBOOK_FILE: &str = "audit_report.xlsx";
pub const DEFAULT_CSV_FILE: &str = "audit_responses.csv";

/// Tier boundaries; either value may be left to the default (80/60)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<f64>,
}

/// Workbook sheet names
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetNamesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

/// Export file and sheet names
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Workbook file name used with --export-dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workbook_file: Option<String>,

    /// Raw responses CSV file name used with --export-dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_file: Option<String>,

    #[serde(default)]
    pub sheets: SheetNamesConfig,
}

impl ExportConfig {
    pub fn workbook_file(&self) -> &str {
        self.workbook_file.as_deref().unwrap_or(DEFAULT_WORKBOOK_FILE)
    }

    pub fn csv_file(&self) -> &str {
        self.csv_file.as_deref().unwrap_or(DEFAULT_CSV_FILE)
    }

    fn merge_from(&mut self, base: ExportConfig) {
        if self.workbook_file.is_none() {
            self.workbook_file = base.workbook_file;
        }
        if self.csv_file.is_none() {
            self.csv_file = base.csv_file;
        }
        let sheets = &mut self.sheets;
        if sheets.responses.is_none() {
            sheets.responses = base.sheets.responses;
        }
        if sheets.area_summary.is_none() {
            sheets.area_summary = base.sheets.area_summary;
        }
        if sheets.final_table.is_none() {
            sheets.final_table = base.sheets.final_table;
        }
        if sheets.narrative.is_none() {
            sheets.narrative = base.sheets.narrative;
        }
    }
}

/// Root config structure for .auditrc.json
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Report title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Question catalog JSON (relative to the config file). Default: built-in 5S catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdsConfig>,

    /// Label of the totals row. Default: "TOTAL"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_label: Option<String>,

    /// Text shown when no area is critical. Default: "None"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none_label: Option<String>,

    /// Minimum overall compliance percentage (exit 1 if below)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_under: Option<f64>,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_fail_under: Option<f64>,
        cli_catalog: Option<&Path>,
    ) -> Self {
        if cli_fail_under.is_some() {
            self.fail_under = cli_fail_under;
        }
        if let Some(path) = cli_catalog {
            self.catalog = Some(path.to_string_lossy().into_owned());
        }
        self
    }

    /// Validated tier thresholds
    pub fn thresholds(&self) -> Result<Thresholds, AuditError> {
        let defaults = Thresholds::default();
        let t = self.thresholds.unwrap_or_default();
        Thresholds::new(t.high.unwrap_or(defaults.high), t.mid.unwrap_or(defaults.mid))
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.title.is_none() {
            self.title = base.title;
        }
        if self.catalog.is_none() {
            self.catalog = base.catalog;
        }
        self.thresholds = match (self.thresholds, base.thresholds) {
            (Some(mine), Some(theirs)) => Some(ThresholdsConfig {
                high: mine.high.or(theirs.high),
                mid: mine.mid.or(theirs.mid),
            }),
            (mine, theirs) => mine.or(theirs),
        };
        if self.total_label.is_none() {
            self.total_label = base.total_label;
        }
        if self.none_label.is_none() {
            self.none_label = base.none_label;
        }
        if self.fail_under.is_none() {
            self.fail_under = base.fail_under;
        }
        self.export.merge_from(base.export);
    }
}
