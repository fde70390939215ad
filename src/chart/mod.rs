//! Chart specifications: (label, value) series over a fixed 0-100 axis with
//! tier-colored bands. Rendering lives in [`svg`].

pub mod svg;

use crate::analyzer::aggregate::Aggregation;
use crate::analyzer::scoring::round2;
use crate::{Thresholds, Tier};
use serde::Serialize;

/// Radar needs at least this many areas to draw a polygon
pub const MIN_RADAR_AREAS: usize = 3;

pub const Y_MIN: f64 = 0.0;
pub const Y_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Radar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Horizontal (line) or radial (radar) band between two percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub from: f64,
    pub to: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
    pub y_min: f64,
    pub y_max: f64,
    pub bands: Vec<Band>,
}

/// Radar outcome: drawn, or skipped with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RadarChart {
    Ready(ChartSpec),
    #[serde(rename_all = "camelCase")]
    Skipped {
        areas_with_data: usize,
        required: usize,
    },
}

impl RadarChart {
    pub fn is_skipped(&self) -> bool {
        matches!(self, RadarChart::Skipped { .. })
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            RadarChart::Ready(spec) => Some(spec),
            RadarChart::Skipped { .. } => None,
        }
    }

    /// Informational notice shown in place of a skipped radar
    pub fn notice(&self) -> Option<String> {
        match self {
            RadarChart::Ready(_) => None,
            RadarChart::Skipped {
                areas_with_data,
                required,
            } => Some(format!(
                "Radar chart needs at least {} areas with data (found {})",
                required, areas_with_data
            )),
        }
    }
}

fn points(aggregation: &Aggregation) -> Vec<ChartPoint> {
    aggregation
        .areas
        .iter()
        .map(|(area, s)| ChartPoint {
            label: area.clone(),
            value: round2(s.ratio),
        })
        .collect()
}

fn bands(thresholds: &Thresholds) -> Vec<Band> {
    thresholds
        .bands()
        .into_iter()
        .map(|(from, to, tier)| Band { from, to, tier })
        .collect()
}

/// Compliance-by-area line chart. Always buildable, even with no areas.
pub fn line_chart(aggregation: &Aggregation, thresholds: &Thresholds) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Compliance by Area".to_string(),
        points: points(aggregation),
        y_min: Y_MIN,
        y_max: Y_MAX,
        bands: bands(thresholds),
    }
}

/// Radar chart by area, skipped below [`MIN_RADAR_AREAS`]
pub fn radar_chart(aggregation: &Aggregation, thresholds: &Thresholds) -> RadarChart {
    let areas_with_data = aggregation.areas_with_data();
    if areas_with_data < MIN_RADAR_AREAS {
        return RadarChart::Skipped {
            areas_with_data,
            required: MIN_RADAR_AREAS,
        };
    }
    RadarChart::Ready(ChartSpec {
        kind: ChartKind::Radar,
        title: "Radar by Area".to_string(),
        points: points(aggregation),
        y_min: Y_MIN,
        y_max: Y_MAX,
        bands: bands(thresholds),
    })
}
