//! Group responses by area and count answers

use crate::{Answer, AreaSummary, OverallSummary, Response};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-area summaries plus their overall totals
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    /// Keyed by area name, so iteration is alphabetical
    pub areas: BTreeMap<String, AreaSummary>,
    pub overall: OverallSummary,
}

impl Aggregation {
    /// Number of areas that have at least one response
    pub fn areas_with_data(&self) -> usize {
        self.areas.values().filter(|a| a.total() > 0).count()
    }
}

/// Aggregate one submission. Pure: the result depends only on the multiset
/// of (area, answer) pairs, never on input order.
pub fn aggregate(responses: &[Response]) -> Aggregation {
    let mut counts: BTreeMap<&str, [usize; 3]> = BTreeMap::new();
    for r in responses {
        let slot = match r.answer {
            Answer::Yes => 0,
            Answer::No => 1,
            Answer::NotApplicable => 2,
        };
        counts.entry(r.area.as_str()).or_default()[slot] += 1;
    }

    let areas: BTreeMap<String, AreaSummary> = counts
        .into_iter()
        .map(|(area, [yes, no, na])| (area.to_string(), AreaSummary::from_counts(yes, no, na)))
        .collect();
    let overall = OverallSummary::from_areas(areas.values());

    Aggregation { areas, overall }
}
