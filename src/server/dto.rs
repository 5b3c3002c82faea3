use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::output::views::{BreakdownView, ClassificationView, Coordinates, Details, FailureView};

pub const DEFAULT_LAT: f64 = 34.754;
pub const DEFAULT_LON: f64 = -78.789;
pub const DEFAULT_FACILITY_NAME: &str = "Unknown Facility";
pub const DEFAULT_BATCH_NAME: &str = "Unknown";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Interpretation {
    pub score_meaning: String,
    pub paved_area_meaning: &'static str,
    pub trailer_meaning: &'static str,
    pub gate_meaning: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub action: &'static str,
    pub expected_roi: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub facility: String,
    pub coordinates: Coordinates,
    pub score: f64,
    pub classification: &'static str,
    pub classification_details: ClassificationView,
    pub details: Details,
    pub breakdown: BreakdownView,
    pub interpretation: Interpretation,
    pub recommendation: Recommendation,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub facilities: Vec<BatchFacility>,
}

#[derive(Debug, Deserialize)]
pub struct BatchFacility {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub name: String,
    pub coordinates: Coordinates,
    pub score: f64,
    pub classification: &'static str,
    pub emoji: &'static str,
    pub details: Details,
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub whales: usize,
    pub standard_prospects: usize,
    pub low_priority: usize,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub total_facilities: usize,
    pub summary: BatchSummary,
    pub top_target: Option<BatchItem>,
    pub results: Vec<BatchItem>,
    pub errors: Vec<FailureView>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
