//! JSON shapes shared by report files and the HTTP API.

use serde::Serialize;

use crate::pipeline::{FacilityFailure, FacilityReport, Summary};
use crate::scoring::{Classification, ComponentContribution, Component, ScoreBreakdown};

/// Round to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weight as a whole percentage, e.g. "50%"
pub fn weight_percent(weight: f64) -> String {
    format!("{:.0}%", weight * 100.0)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Details {
    pub trailers: u32,
    pub paved_pct: f64,
    pub gates: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentView {
    pub raw_value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
    pub weight: String,
    pub contribution: f64,
    pub interpretation: &'static str,
}

impl From<&ComponentContribution> for ComponentView {
    fn from(c: &ComponentContribution) -> Self {
        match c.component {
            Component::PavedArea => ComponentView {
                raw_value: serde_json::Value::from(format!("{:.1}%", c.raw_value)),
                normalized: None,
                weight: weight_percent(c.weight),
                contribution: round1(c.contribution),
                interpretation: c.interpretation,
            },
            Component::TrailerCount | Component::GateNodes => ComponentView {
                // Counts are whole numbers stored as f64
                raw_value: serde_json::Value::from(c.raw_value as u64),
                normalized: Some(format!("{:.1}/100", c.normalized)),
                weight: weight_percent(c.weight),
                contribution: round1(c.contribution),
                interpretation: c.interpretation,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentsView {
    pub paved_area: ComponentView,
    pub trailer_count: ComponentView,
    pub gate_nodes: ComponentView,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BreakdownView {
    pub total_score: f64,
    pub components: ComponentsView,
    pub formula: String,
}

impl From<&ScoreBreakdown> for BreakdownView {
    fn from(b: &ScoreBreakdown) -> Self {
        BreakdownView {
            total_score: round1(b.total_score),
            components: ComponentsView {
                paved_area: (&b.paved_area).into(),
                trailer_count: (&b.trailer_count).into(),
                gate_nodes: (&b.gate_nodes).into(),
            },
            formula: b.formula(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationView {
    pub label: &'static str,
    pub emoji: &'static str,
    pub tier: &'static str,
    pub score_range: &'static str,
    pub description: &'static str,
    pub expected_roi: &'static str,
    pub action: &'static str,
}

impl From<&Classification> for ClassificationView {
    fn from(c: &Classification) -> Self {
        ClassificationView {
            label: c.label,
            emoji: c.emoji,
            tier: c.priority,
            score_range: c.score_range,
            description: c.description,
            expected_roi: c.expected_roi,
            action: c.action,
        }
    }
}

/// One ranked facility with everything a sales follow-up needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FacilityView {
    pub name: String,
    pub segment: String,
    pub coordinates: Coordinates,
    pub score: f64,
    pub classification: &'static str,
    pub classification_label: &'static str,
    pub emoji: &'static str,
    pub expected_roi: &'static str,
    pub action: &'static str,
    pub details: Details,
    pub breakdown: BreakdownView,
}

impl From<&FacilityReport> for FacilityView {
    fn from(r: &FacilityReport) -> Self {
        let c = r.classification();
        FacilityView {
            name: r.facility.name.clone(),
            segment: r.facility.segment_label().to_string(),
            coordinates: Coordinates {
                lat: r.facility.lat,
                lon: r.facility.lon,
            },
            score: round1(r.score()),
            classification: c.priority,
            classification_label: c.label,
            emoji: c.emoji,
            expected_roi: c.expected_roi,
            action: c.action,
            details: details(r),
            breakdown: (&r.result.breakdown).into(),
        }
    }
}

pub fn details(r: &FacilityReport) -> Details {
    Details {
        trailers: r.measurement.trailer_count,
        paved_pct: round1(r.measurement.paved_area_pct),
        gates: r.measurement.gate_count,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryView {
    pub whales: usize,
    pub standard: usize,
    pub low: usize,
}

impl From<Summary> for SummaryView {
    fn from(s: Summary) -> Self {
        SummaryView {
            whales: s.whales,
            standard: s.standard,
            low: s.low,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailureView {
    pub name: String,
    pub error: String,
}

impl From<&FacilityFailure> for FailureView {
    fn from(f: &FacilityFailure) -> Self {
        FailureView {
            name: f.name.clone(),
            error: f.error.clone(),
        }
    }
}
