//! Audit engine - runs one submission through aggregation, scoring,
//! narrative, and chart building

use super::aggregate::aggregate;
use super::narrative::build_narrative_summary;
use super::scoring::{build_area_table, build_final_table};
use crate::chart::{line_chart, radar_chart, RadarChart};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::form::Submission;
use crate::{AuditError, AuditReport, Thresholds};
use tracing::{debug, info};

pub const DEFAULT_TITLE: &str = "Checklist Audit";
pub const DEFAULT_TOTAL_LABEL: &str = "TOTAL";
pub const DEFAULT_NONE_LABEL: &str = "None";

/// Stateless pipeline: the same submission always yields the same report
/// (apart from the generation timestamp)
#[derive(Debug, Clone)]
pub struct AuditEngine {
    title: String,
    thresholds: Thresholds,
    total_label: String,
    none_label: String,
}

impl AuditEngine {
    /// Engine with default thresholds (80/60) and labels
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            thresholds: Thresholds::default(),
            total_label: DEFAULT_TOTAL_LABEL.to_string(),
            none_label: DEFAULT_NONE_LABEL.to_string(),
        }
    }

    /// Engine configured from .auditrc.json
    pub fn from_config(config: &Config) -> Result<Self, AuditError> {
        let mut engine = Self::new().with_thresholds(config.thresholds()?);
        if let Some(ref title) = config.title {
            engine = engine.with_title(title);
        }
        if let Some(ref label) = config.total_label {
            engine = engine.with_total_label(label);
        }
        if let Some(ref label) = config.none_label {
            engine = engine.with_none_label(label);
        }
        Ok(engine)
    }

    /// Engine configured from .auditrc.json, titled after the catalog
    /// unless the config names a title
    pub fn for_catalog(config: &Config, catalog: &Catalog) -> Result<Self, AuditError> {
        let engine = Self::from_config(config)?;
        Ok(match config.title {
            Some(_) => engine,
            None => engine.with_title(catalog.name()),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Label of the totals row ("TOTAL", "TOTAL EVALUACIÓN", ...)
    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    /// Text used when no area is critical
    pub fn with_none_label(mut self, label: impl Into<String>) -> Self {
        self.none_label = label.into();
        self
    }

    /// Process one submission start to finish
    pub fn run(&self, submission: &Submission) -> AuditReport {
        let responses = submission.responses().to_vec();
        let aggregation = aggregate(&responses);
        debug!(
            areas = aggregation.areas.len(),
            reviewed = aggregation.overall.reviewed,
            "aggregated responses"
        );

        let area_table = build_area_table(&aggregation, &self.total_label);
        let final_table = build_final_table(&aggregation, &self.thresholds, &self.total_label);
        let narrative = build_narrative_summary(&final_table, &self.thresholds, &self.none_label);
        let line_chart = line_chart(&aggregation, &self.thresholds);
        let radar_chart = radar_chart(&aggregation, &self.thresholds);
        if let RadarChart::Skipped {
            areas_with_data,
            required,
        } = radar_chart
        {
            info!(areas_with_data, required, "radar chart skipped");
        }

        AuditReport {
            title: self.title.clone(),
            header: submission.header.clone(),
            generated_at: chrono::Utc::now(),
            thresholds: self.thresholds,
            responses,
            areas: aggregation.areas,
            overall: aggregation.overall,
            area_table,
            final_table,
            narrative,
            line_chart,
            radar_chart,
        }
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}
