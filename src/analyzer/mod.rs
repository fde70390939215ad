//! Analyzer module - aggregation, tier scoring, and narrative summary

pub mod aggregate;
pub mod engine;
pub mod narrative;
pub mod scoring;

pub use aggregate::{aggregate, Aggregation};
pub use engine::AuditEngine;
pub use narrative::{build_narrative_summary, NarrativeSummary};
pub use scoring::{
    build_area_table, build_final_table, classify, AreaTable, AreaTableRow, FinalRow, FinalTable,
};
