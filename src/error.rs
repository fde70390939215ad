//! Typed errors for catalog, response sheet, and threshold validation

use thiserror::Error;

/// Errors raised while assembling a submission.
///
/// Aggregation itself never fails: empty areas and zero denominators are
/// absorbed as zero counts and a zero ratio.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("catalog area #{index} has an empty name")]
    EmptyAreaName { index: usize },

    #[error("catalog area '{area}' has no questions")]
    EmptyArea { area: String },

    #[error("catalog area '{area}' is declared more than once")]
    DuplicateArea { area: String },

    #[error("catalog area '{area}' repeats question: {prompt}")]
    DuplicateQuestion { area: String, prompt: String },

    #[error("row {row}: question not in catalog: [{area}] {prompt}")]
    UnknownQuestion {
        row: usize,
        area: String,
        prompt: String,
    },

    #[error("row {row}: question answered twice: [{area}] {prompt}")]
    DuplicateResponse {
        row: usize,
        area: String,
        prompt: String,
    },

    #[error("{count} catalog question(s) have no response, first: [{area}] {prompt}")]
    MissingResponses {
        count: usize,
        area: String,
        prompt: String,
    },

    #[error("row {row}: invalid answer '{value}' (expected YES, NO or NA)")]
    InvalidAnswer { row: usize, value: String },

    #[error("invalid audit date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("invalid thresholds high={high} mid={mid} (need 0 <= mid <= high <= 100)")]
    InvalidThresholds { high: f64, mid: f64 },

    #[error("unsupported sheet format: {0}")]
    UnsupportedFormat(String),
}
