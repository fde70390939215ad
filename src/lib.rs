//! Checklist Audit: compliance scoring for inspection checklists
//!
//! This library takes one snapshot of yes/no/not-applicable answers against a
//! fixed question catalog, aggregates compliance per area and overall,
//! classifies the ratios into tiers, and renders tables, charts, and exports.

pub mod analyzer;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod reporter;

pub use error::AuditError;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer given to a single checklist question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "YES", alias = "SI")]
    Yes,
    #[serde(rename = "NO")]
    No,
    #[serde(rename = "NA", alias = "NOT_APPLICABLE")]
    NotApplicable,
}

impl Answer {
    /// All answers, in the order the form offers them
    pub const ALL: [Answer; 3] = [Answer::Yes, Answer::No, Answer::NotApplicable];

    /// Parse a sheet cell. Accepts English and Spanish spellings, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "YES" | "Y" | "SI" | "SÍ" | "S" => Some(Answer::Yes),
            "NO" | "N" => Some(Answer::No),
            "NA" | "N/A" | "N.A." | "NOT_APPLICABLE" | "NOT APPLICABLE" => {
                Some(Answer::NotApplicable)
            }
            _ => None,
        }
    }

    /// Whether this answer counts toward the compliance denominator
    pub fn is_reviewed(self) -> bool {
        !matches!(self, Answer::NotApplicable)
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Yes => write!(f, "YES"),
            Answer::No => write!(f, "NO"),
            Answer::NotApplicable => write!(f, "NA"),
        }
    }
}

/// A catalog question. Belongs to exactly one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Area the question belongs to
    pub area: String,
    /// Prompt text shown to the auditor
    pub prompt: String,
}

/// One answered question within a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Area, copied from the question
    pub area: String,
    /// Prompt text, copied from the question
    pub prompt: String,
    pub answer: Answer,
    /// Free-text observation (may be empty)
    #[serde(default)]
    pub observation: String,
}

impl Response {
    pub fn new(question: &Question, answer: Answer) -> Self {
        Self {
            area: question.area.clone(),
            prompt: question.prompt.clone(),
            answer,
            observation: String::new(),
        }
    }

    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = observation.into();
        self
    }
}

/// Compliance ratio in percent: YES / (YES + NO) * 100, or 0 when nothing was reviewed
pub fn compliance_ratio(yes: usize, no: usize) -> f64 {
    let reviewed = yes + no;
    if reviewed == 0 {
        return 0.0;
    }
    (yes as f64 / reviewed as f64) * 100.0
}

/// Per-area answer counts and compliance
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    pub yes: usize,
    pub no: usize,
    pub not_applicable: usize,
    /// YES + NO
    pub reviewed: usize,
    /// Compliance percentage (0-100)
    pub ratio: f64,
}

impl AreaSummary {
    pub fn from_counts(yes: usize, no: usize, not_applicable: usize) -> Self {
        Self {
            yes,
            no,
            not_applicable,
            reviewed: yes + no,
            ratio: compliance_ratio(yes, no),
        }
    }

    /// Total number of responses counted in this area
    pub fn total(&self) -> usize {
        self.yes + self.no + self.not_applicable
    }
}

/// Totals across every area of one submission
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub reviewed: usize,
    pub yes: usize,
    pub no: usize,
    pub not_applicable: usize,
    /// Ratio of the summed YES/NO counts, not a mean of area ratios
    pub ratio: f64,
}

impl OverallSummary {
    pub fn from_areas<'a>(areas: impl IntoIterator<Item = &'a AreaSummary>) -> Self {
        let (yes, no, not_applicable) = areas
            .into_iter()
            .fold((0, 0, 0), |(y, n, na), a| {
                (y + a.yes, n + a.no, na + a.not_applicable)
            });
        Self {
            reviewed: yes + no,
            yes,
            no,
            not_applicable,
            ratio: compliance_ratio(yes, no),
        }
    }
}

/// Severity tier used for color-coding a compliance ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    /// Fill color as 0xRRGGBB, used by the HTML and workbook renderers
    pub fn fill_rgb(self) -> u32 {
        match self {
            Tier::High => 0x6EFC47,
            Tier::Medium => 0xFFF200,
            Tier::Low => 0xEA2828,
        }
    }

    /// Fill color as a CSS hex string
    pub fn fill_hex(self) -> String {
        format!("#{:06X}", self.fill_rgb())
    }

    pub fn description(self) -> &'static str {
        match self {
            Tier::High => "Compliant - conditions are maintained",
            Tier::Medium => "Partially compliant - needs follow-up",
            Tier::Low => "Critical - corrective action required",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::High => write!(f, "HIGH"),
            Tier::Medium => write!(f, "MEDIUM"),
            Tier::Low => write!(f, "LOW"),
        }
    }
}

/// Tier boundaries. A ratio equal to a boundary belongs to the higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    /// Lowest ratio classified HIGH
    pub high: f64,
    /// Lowest ratio classified MEDIUM
    pub mid: f64,
}

impl Thresholds {
    /// Build thresholds, requiring 0 <= mid <= high <= 100
    pub fn new(high: f64, mid: f64) -> Result<Self, AuditError> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(high) || !in_range(mid) || mid > high {
            return Err(AuditError::InvalidThresholds { high, mid });
        }
        Ok(Self { high, mid })
    }

    /// Classify a compliance ratio
    pub fn classify(&self, ratio: f64) -> Tier {
        if ratio >= self.high {
            Tier::High
        } else if ratio >= self.mid {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    /// Tier bands over the fixed 0-100 axis, highest first
    pub fn bands(&self) -> [(f64, f64, Tier); 3] {
        [
            (self.high, 100.0, Tier::High),
            (self.mid, self.high, Tier::Medium),
            (0.0, self.mid, Tier::Low),
        ]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            mid: 60.0,
        }
    }
}

/// Who ran the audit and when. Both fields are optional on the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auditor: Option<String>,
}

/// Everything produced for one submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub title: String,
    pub header: AuditHeader,
    pub generated_at: DateTime<Utc>,
    pub thresholds: Thresholds,
    /// Raw responses, in catalog order
    pub responses: Vec<Response>,
    /// Per-area summaries, keyed by area name
    pub areas: BTreeMap<String, AreaSummary>,
    pub overall: OverallSummary,
    /// NA/NO/YES/% per area plus the totals row
    pub area_table: analyzer::scoring::AreaTable,
    pub final_table: analyzer::scoring::FinalTable,
    pub narrative: analyzer::narrative::NarrativeSummary,
    pub line_chart: chart::ChartSpec,
    pub radar_chart: chart::RadarChart,
}

/// Public API: load config, catalog, and a response sheet, and run the audit.
///
/// * `sheet` - CSV or JSON response sheet
/// * `work_dir` - directory used for config lookup
/// * `config_path` - optional path to .auditrc.json; if None, searches from work_dir
pub fn audit_file(
    sheet: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<AuditReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let catalog = crate::config::load_catalog(&config, work_dir)?;
    let submission = crate::form::sheet::load_sheet(sheet, &catalog)?;
    let engine = crate::analyzer::AuditEngine::for_catalog(&config, &catalog)?;
    Ok(engine.run(&submission))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_parse_spellings() {
        assert_eq!(Answer::parse("yes"), Some(Answer::Yes));
        assert_eq!(Answer::parse(" SI "), Some(Answer::Yes));
        assert_eq!(Answer::parse("Sí"), Some(Answer::Yes));
        assert_eq!(Answer::parse("n"), Some(Answer::No));
        assert_eq!(Answer::parse("N/A"), Some(Answer::NotApplicable));
        assert_eq!(Answer::parse("not_applicable"), Some(Answer::NotApplicable));
        assert_eq!(Answer::parse(""), None);
        assert_eq!(Answer::parse("maybe"), None);
    }

    #[test]
    fn test_answer_serializes_short_labels() {
        let json = serde_json::to_string(&Answer::ALL).unwrap();
        assert_eq!(json, r#"["YES","NO","NA"]"#);
    }

    #[test]
    fn test_compliance_ratio_zero_denominator() {
        assert_eq!(compliance_ratio(0, 0), 0.0);
        assert_eq!(compliance_ratio(3, 1), 75.0);
        assert_eq!(compliance_ratio(0, 4), 0.0);
        assert_eq!(compliance_ratio(5, 0), 100.0);
    }

    #[test]
    fn test_area_summary_reviewed_excludes_na() {
        let s = AreaSummary::from_counts(2, 1, 4);
        assert_eq!(s.reviewed, 3);
        assert_eq!(s.total(), 7);
        assert!((s.ratio - 66.666_666).abs() < 1e-4);
    }

    #[test]
    fn test_overall_uses_summed_counts() {
        let areas = [AreaSummary::from_counts(1, 0, 0), AreaSummary::from_counts(0, 9, 2)];
        let overall = OverallSummary::from_areas(&areas);
        assert_eq!(overall.yes, 1);
        assert_eq!(overall.no, 9);
        assert_eq!(overall.not_applicable, 2);
        assert_eq!(overall.reviewed, 10);
        assert_eq!(overall.ratio, 10.0);
    }

    #[test]
    fn test_thresholds_boundaries_belong_to_higher_tier() {
        let t = Thresholds::default();
        assert_eq!(t.classify(80.0), Tier::High);
        assert_eq!(t.classify(79.99), Tier::Medium);
        assert_eq!(t.classify(60.0), Tier::Medium);
        assert_eq!(t.classify(59.0), Tier::Low);
        assert_eq!(t.classify(0.0), Tier::Low);
        assert_eq!(t.classify(100.0), Tier::High);
    }

    #[test]
    fn test_thresholds_alternate_deployment() {
        let t = Thresholds::new(85.0, 70.0).unwrap();
        assert_eq!(t.classify(85.0), Tier::High);
        assert_eq!(t.classify(84.0), Tier::Medium);
        assert_eq!(t.classify(70.0), Tier::Medium);
        assert_eq!(t.classify(69.0), Tier::Low);
    }

    #[test]
    fn test_thresholds_rejects_inverted_or_out_of_range() {
        assert!(Thresholds::new(60.0, 80.0).is_err());
        assert!(Thresholds::new(120.0, 60.0).is_err());
        assert!(Thresholds::new(80.0, -1.0).is_err());
        assert!(Thresholds::new(f64::NAN, 60.0).is_err());
        assert!(Thresholds::new(70.0, 70.0).is_ok());
    }

    #[test]
    fn test_tier_fill_hex() {
        assert_eq!(Tier::High.fill_hex(), "#6EFC47");
        assert_eq!(Tier::Medium.fill_hex(), "#FFF200");
        assert_eq!(Tier::Low.fill_hex(), "#EA2828");
    }
}
