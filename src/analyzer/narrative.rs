//! Narrative summary: totals, best area(s), critical areas

use super::scoring::{format_ratio, FinalTable};
use crate::Thresholds;
use serde::Serialize;

/// Headline record shown above the final table and exported on its own sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeSummary {
    pub total_reviewed: usize,
    /// The TOTAL row ratio
    pub average_ratio: f64,
    /// Every area tied at the maximum ratio
    pub best_areas: Vec<String>,
    pub best_ratio: Option<f64>,
    /// Areas below the MEDIUM threshold
    pub critical_areas: Vec<String>,
    /// e.g. "AISLE, SEWING (100%)"
    pub best_areas_text: String,
    /// Comma-joined critical areas, or the "none" label
    pub critical_areas_text: String,
}

/// Build the narrative summary from the final table
pub fn build_narrative_summary(
    table: &FinalTable,
    thresholds: &Thresholds,
    none_label: &str,
) -> NarrativeSummary {
    let best_ratio = table
        .rows
        .iter()
        .map(|r| r.ratio)
        .fold(None, |max: Option<f64>, r| Some(max.map_or(r, |m| m.max(r))));

    let best_areas: Vec<String> = match best_ratio {
        Some(max) => table
            .rows
            .iter()
            .filter(|r| r.ratio == max)
            .map(|r| r.area.clone())
            .collect(),
        None => Vec::new(),
    };
    let best_areas_text = match best_ratio {
        Some(max) => format!("{} ({}%)", best_areas.join(", "), format_ratio(max)),
        None => none_label.to_string(),
    };

    let critical_areas: Vec<String> = table
        .rows
        .iter()
        .filter(|r| r.ratio < thresholds.mid)
        .map(|r| r.area.clone())
        .collect();
    let critical_areas_text = if critical_areas.is_empty() {
        none_label.to_string()
    } else {
        critical_areas.join(", ")
    };

    NarrativeSummary {
        total_reviewed: table.total.reviewed,
        average_ratio: table.total.ratio,
        best_areas,
        best_ratio,
        critical_areas,
        best_areas_text,
        critical_areas_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::scoring::FinalRow;
    use crate::Tier;

    fn row(area: &str, yes: usize, no: usize, ratio: f64) -> FinalRow {
        FinalRow {
            area: area.to_string(),
            reviewed: yes + no,
            yes,
            no,
            not_applicable: 0,
            ratio,
            tier: Thresholds::default().classify(ratio),
        }
    }

    fn table(rows: Vec<FinalRow>, total: FinalRow) -> FinalTable {
        FinalTable { rows, total }
    }

    #[test]
    fn test_ties_at_maximum_are_all_listed() {
        let t = table(
            vec![
                row("AISLE", 4, 0, 100.0),
                row("SEWING", 2, 2, 50.0),
                row("WAREHOUSE", 3, 0, 100.0),
            ],
            row("TOTAL", 9, 2, 81.82),
        );
        let n = build_narrative_summary(&t, &Thresholds::default(), "None");
        assert_eq!(n.best_areas, vec!["AISLE", "WAREHOUSE"]);
        assert_eq!(n.best_areas_text, "AISLE, WAREHOUSE (100%)");
        assert_eq!(n.best_ratio, Some(100.0));
        assert_eq!(n.total_reviewed, 11);
        assert_eq!(n.average_ratio, 81.82);
    }

    #[test]
    fn test_critical_areas_below_mid_threshold() {
        let t = table(
            vec![row("A", 3, 2, 60.0), row("B", 1, 1, 50.0), row("C", 0, 2, 0.0)],
            row("TOTAL", 4, 5, 44.44),
        );
        let n = build_narrative_summary(&t, &Thresholds::default(), "None");
        assert_eq!(n.critical_areas, vec!["B", "C"]);
        assert_eq!(n.critical_areas_text, "B, C");
    }

    #[test]
    fn test_no_critical_areas_uses_none_label() {
        let t = table(vec![row("A", 4, 1, 80.0)], row("TOTAL", 4, 1, 80.0));
        let n = build_narrative_summary(&t, &Thresholds::default(), "Ninguna");
        assert!(n.critical_areas.is_empty());
        assert_eq!(n.critical_areas_text, "Ninguna");
    }

    #[test]
    fn test_critical_depends_on_configured_mid() {
        let t = table(vec![row("A", 13, 7, 65.0)], row("TOTAL", 13, 7, 65.0));
        let strict = Thresholds::new(85.0, 70.0).unwrap();
        let n = build_narrative_summary(&t, &strict, "None");
        assert_eq!(n.critical_areas, vec!["A"]);
        assert_eq!(t.rows[0].tier, Tier::Medium);
    }

    #[test]
    fn test_empty_table() {
        let t = table(vec![], row("TOTAL", 0, 0, 0.0));
        let n = build_narrative_summary(&t, &Thresholds::default(), "None");
        assert!(n.best_areas.is_empty());
        assert_eq!(n.best_ratio, None);
        assert_eq!(n.best_areas_text, "None");
        assert_eq!(n.critical_areas_text, "None");
        assert_eq!(n.average_ratio, 0.0);
    }
}
