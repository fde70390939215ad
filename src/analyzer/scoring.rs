//! Tier classification and the final per-area table

use super::aggregate::Aggregation;
use crate::{compliance_ratio, Thresholds, Tier};
use serde::Serialize;

/// Round a percentage to 2 decimals for display and export
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a percentage without trailing zeros: 100, 62.5, 66.67
pub fn format_ratio(value: f64) -> String {
    let s = format!("{:.2}", round2(value));
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Classify a compliance ratio against the configured thresholds
pub fn classify(ratio: f64, thresholds: &Thresholds) -> Tier {
    thresholds.classify(ratio)
}

/// One row of the final table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalRow {
    pub area: String,
    pub reviewed: usize,
    pub yes: usize,
    pub no: usize,
    pub not_applicable: usize,
    /// Compliance percentage, rounded to 2 decimals
    pub ratio: f64,
    pub tier: Tier,
}

/// Area rows in area order, plus the TOTAL row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalTable {
    pub rows: Vec<FinalRow>,
    pub total: FinalRow,
}

impl FinalTable {
    /// Area rows followed by the TOTAL row
    pub fn all_rows(&self) -> impl Iterator<Item = &FinalRow> {
        self.rows.iter().chain(std::iter::once(&self.total))
    }
}

/// Build the final table. The TOTAL ratio comes from the summed YES/NO
/// counts, so areas weigh by how many items they reviewed.
pub fn build_final_table(
    aggregation: &Aggregation,
    thresholds: &Thresholds,
    total_label: &str,
) -> FinalTable {
    let rows: Vec<FinalRow> = aggregation
        .areas
        .iter()
        .map(|(area, s)| {
            let ratio = round2(s.ratio);
            FinalRow {
                area: area.clone(),
                reviewed: s.reviewed,
                yes: s.yes,
                no: s.no,
                not_applicable: s.not_applicable,
                ratio,
                tier: classify(ratio, thresholds),
            }
        })
        .collect();

    let yes: usize = rows.iter().map(|r| r.yes).sum();
    let no: usize = rows.iter().map(|r| r.no).sum();
    let not_applicable: usize = rows.iter().map(|r| r.not_applicable).sum();
    let ratio = round2(compliance_ratio(yes, no));
    let total = FinalRow {
        area: total_label.to_string(),
        reviewed: yes + no,
        yes,
        no,
        not_applicable,
        ratio,
        tier: classify(ratio, thresholds),
    };

    FinalTable { rows, total }
}

/// Row of the per-area summary sheet: NA, NO, YES, %
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTableRow {
    pub area: String,
    pub not_applicable: usize,
    pub no: usize,
    pub yes: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaTable {
    pub rows: Vec<AreaTableRow>,
    pub total: AreaTableRow,
}

impl AreaTable {
    pub fn all_rows(&self) -> impl Iterator<Item = &AreaTableRow> {
        self.rows.iter().chain(std::iter::once(&self.total))
    }
}

/// Per-area answer counts with a totals row, unclassified
pub fn build_area_table(aggregation: &Aggregation, total_label: &str) -> AreaTable {
    let rows = aggregation
        .areas
        .iter()
        .map(|(area, s)| AreaTableRow {
            area: area.clone(),
            not_applicable: s.not_applicable,
            no: s.no,
            yes: s.yes,
            ratio: round2(s.ratio),
        })
        .collect();
    let o = &aggregation.overall;
    let total = AreaTableRow {
        area: total_label.to_string(),
        not_applicable: o.not_applicable,
        no: o.no,
        yes: o.yes,
        ratio: round2(o.ratio),
    };
    AreaTable { rows, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::aggregate::aggregate;
    use crate::{Answer, Response};

    fn responses(spec: &[(&str, Answer, usize)]) -> Vec<Response> {
        let mut out = Vec::new();
        for (area, answer, n) in spec {
            for i in 0..*n {
                out.push(Response {
                    area: area.to_string(),
                    prompt: format!("{area}-{answer}-{i}"),
                    answer: *answer,
                    observation: String::new(),
                });
            }
        }
        out
    }

    #[test]
    fn test_total_is_weighted_not_mean_of_ratios() {
        // 1 reviewed item at 100% and 9 reviewed items at 0%
        let agg = aggregate(&responses(&[("A", Answer::Yes, 1), ("B", Answer::No, 9)]));
        let table = build_final_table(&agg, &Thresholds::default(), "TOTAL");
        assert_eq!(table.rows[0].ratio, 100.0);
        assert_eq!(table.rows[1].ratio, 0.0);
        assert_eq!(table.total.ratio, 10.0);
        assert_eq!(table.total.tier, Tier::Low);
    }

    #[test]
    fn test_total_row_sums_counts() {
        let agg = aggregate(&responses(&[
            ("A", Answer::Yes, 3),
            ("A", Answer::NotApplicable, 2),
            ("B", Answer::No, 1),
            ("B", Answer::Yes, 1),
        ]));
        let table = build_final_table(&agg, &Thresholds::default(), "TOTAL EVALUACIÓN");
        let t = &table.total;
        assert_eq!(t.area, "TOTAL EVALUACIÓN");
        assert_eq!((t.reviewed, t.yes, t.no, t.not_applicable), (5, 4, 1, 2));
        assert_eq!(t.ratio, 80.0);
        assert_eq!(t.tier, Tier::High);
        assert_eq!(table.all_rows().count(), 3);
    }

    #[test]
    fn test_rows_rounded_and_classified() {
        let agg = aggregate(&responses(&[("A", Answer::Yes, 2), ("A", Answer::No, 1)]));
        let table = build_final_table(&agg, &Thresholds::default(), "TOTAL");
        assert_eq!(table.rows[0].ratio, 66.67);
        assert_eq!(table.rows[0].tier, Tier::Medium);
    }

    #[test]
    fn test_classify_boundaries() {
        let t = Thresholds::new(85.0, 70.0).unwrap();
        assert_eq!(classify(85.0, &t), Tier::High);
        assert_eq!(classify(70.0, &t), Tier::Medium);
        assert_eq!(classify(69.0, &t), Tier::Low);
    }

    #[test]
    fn test_empty_aggregation_total_is_zero() {
        let table = build_final_table(&aggregate(&[]), &Thresholds::default(), "TOTAL");
        assert!(table.rows.is_empty());
        assert_eq!(table.total.ratio, 0.0);
        assert_eq!(table.total.reviewed, 0);
    }

    #[test]
    fn test_area_table_counts_and_total() {
        let agg = aggregate(&responses(&[
            ("A", Answer::Yes, 1),
            ("A", Answer::NotApplicable, 3),
            ("B", Answer::No, 2),
        ]));
        let table = build_area_table(&agg, "TOTAL");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].not_applicable, 3);
        assert_eq!(table.rows[0].ratio, 100.0);
        assert_eq!(table.total.area, "TOTAL");
        assert_eq!((table.total.yes, table.total.no), (1, 2));
        assert_eq!(table.total.ratio, 33.33);
        assert_eq!(table.all_rows().last().unwrap().area, "TOTAL");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(100.0), "100");
        assert_eq!(format_ratio(62.5), "62.5");
        assert_eq!(format_ratio(200.0 / 3.0), "66.67");
        assert_eq!(format_ratio(0.0), "0");
    }
}
