//! HTTP handlers for the scoring API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::dto::{
    BatchItem, BatchRequest, BatchResponse, BatchSummary, ErrorResponse, HealthResponse,
    Interpretation, Recommendation, ScoreQuery, ScoreResponse, DEFAULT_BATCH_NAME,
    DEFAULT_FACILITY_NAME, DEFAULT_LAT, DEFAULT_LON,
};
use super::AppState;
use crate::error::{AnalysisError, ScoringError};
use crate::facility::Facility;
use crate::output::views::{details, round1, weight_percent, Coordinates, FailureView};
use crate::pipeline::{analyze_facility, run_batch, FacilityReport};
use crate::scoring::{analyze, Component, Measurement, Tier};

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

/// Errors a handler can return, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Analysis(AnalysisError),
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(AnalysisError::Scoring(ScoringError::Validation { .. })) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Analysis(AnalysisError::Scoring(ScoringError::Configuration(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Analysis(AnalysisError::Provider { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Analysis(AnalysisError::Scoring(ScoringError::Inconsistent { .. })) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(message) => message,
            ApiError::Analysis(e) => e.to_string(),
        };
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET / - Health check
pub async fn health() -> Json<HealthResponse> {
    let endpoints = BTreeMap::from([
        ("/api/score", "GET - Calculate Yard Velocity Score"),
        ("/api/explain", "GET - Algorithm documentation"),
        ("/api/batch", "POST - Batch process facilities"),
    ]);
    Json(HealthResponse {
        status: "online",
        message: "Yard Velocity backend is live",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

/// GET /api/score - Score one facility
pub async fn score(
    State(state): State<AppState>,
    query: Result<Query<ScoreQuery>, QueryRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Query(query) = query?;
    let facility = Facility::new(
        query.name.unwrap_or_else(|| DEFAULT_FACILITY_NAME.to_string()),
        query.lat.unwrap_or(DEFAULT_LAT),
        query.lon.unwrap_or(DEFAULT_LON),
    );
    tracing::info!(facility = %facility.name, lat = facility.lat, lon = facility.lon, "analyzing");

    let report = analyze_facility(&facility, &state.providers, &state.scoring).await?;
    Ok(Json(score_response(&report)))
}

fn score_response(report: &FacilityReport) -> ScoreResponse {
    let c = report.classification();
    let b = &report.result.breakdown;
    ScoreResponse {
        facility: report.facility.name.clone(),
        coordinates: Coordinates {
            lat: report.facility.lat,
            lon: report.facility.lon,
        },
        score: round1(report.score()),
        classification: c.priority,
        classification_details: c.into(),
        details: details(report),
        breakdown: b.into(),
        interpretation: Interpretation {
            score_meaning: format!(
                "This facility scores {:.1}/100, classified as {}",
                report.score(),
                c.label
            ),
            paved_area_meaning: b.paved_area.interpretation,
            trailer_meaning: b.trailer_count.interpretation,
            gate_meaning: b.gate_nodes.interpretation,
        },
        recommendation: Recommendation {
            action: c.action,
            expected_roi: c.expected_roi,
        },
    }
}

fn batch_item(report: &FacilityReport) -> BatchItem {
    let c = report.classification();
    BatchItem {
        name: report.facility.name.clone(),
        coordinates: Coordinates {
            lat: report.facility.lat,
            lon: report.facility.lon,
        },
        score: round1(report.score()),
        classification: c.priority,
        emoji: c.emoji,
        details: details(report),
    }
}

/// POST /api/batch - Score many facilities, highest first
pub async fn batch(
    State(state): State<AppState>,
    req: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(req) = req?;
    if req.facilities.is_empty() {
        return Err(ApiError::BadRequest("No facilities provided".to_string()));
    }

    let facilities: Vec<Facility> = req
        .facilities
        .into_iter()
        .map(|f| {
            Facility::new(
                f.name.unwrap_or_else(|| DEFAULT_BATCH_NAME.to_string()),
                f.lat.unwrap_or(0.0),
                f.lon.unwrap_or(0.0),
            )
        })
        .collect();
    tracing::info!(count = facilities.len(), "batch request");

    let outcome = run_batch(&facilities, &state.providers, &state.scoring).await;
    let summary = outcome.summary();
    let results: Vec<BatchItem> = outcome.ranked.iter().map(batch_item).collect();

    Ok(Json(BatchResponse {
        total_facilities: results.len(),
        summary: BatchSummary {
            whales: summary.whales,
            standard_prospects: summary.standard,
            low_priority: summary.low,
        },
        top_target: results.first().cloned(),
        results,
        errors: outcome.failures.iter().map(FailureView::from).collect(),
    }))
}

/// GET /api/explain - Algorithm documentation for the active configuration
pub async fn explain(State(state): State<AppState>) -> Json<Value> {
    let weights = state.scoring.weights;
    let benchmarks = state.scoring.benchmarks;

    let classifications: serde_json::Map<String, Value> = Tier::ALL
        .iter()
        .map(|tier| {
            let c = tier.classification();
            (
                c.label.to_lowercase(),
                json!({
                    "score_range": c.score_range,
                    "emoji": c.emoji,
                    "label": c.priority,
                    "description": c.description,
                    "expected_roi": c.expected_roi,
                    "action": c.action,
                }),
            )
        })
        .collect();

    let interpretation: serde_json::Map<String, Value> = Component::ALL
        .iter()
        .map(|component| {
            let table: serde_json::Map<String, Value> = component
                .interpretation_table()
                .into_iter()
                .map(|(range, text)| (range.to_string(), Value::from(text)))
                .collect();
            (component.key().to_string(), Value::Object(table))
        })
        .collect();

    let example = Measurement::new(85.0, 180, 3);
    let example_json = match analyze(&example, &state.scoring) {
        Ok(result) => {
            let b = &result.breakdown;
            json!({
                "input": {
                    "paved_area": example.paved_area_pct,
                    "trailer_count": example.trailer_count,
                    "gate_nodes": example.gate_count,
                },
                "calculation": {
                    "paved_contribution": format!("{} × {:.1} = {:.1}", weights.alpha, b.paved_area.normalized, b.paved_area.contribution),
                    "trailer_normalized": format!("{} / {} × 100 = {:.1}", example.trailer_count, benchmarks.max_trailer_benchmark, b.trailer_count.normalized),
                    "trailer_contribution": format!("{} × {:.1} = {:.1}", weights.beta, b.trailer_count.normalized, b.trailer_count.contribution),
                    "gate_normalized": format!("{} / {} × 100 = {:.1}", example.gate_count, benchmarks.max_gate_benchmark, b.gate_nodes.normalized),
                    "gate_contribution": format!("{} × {:.1} = {:.1}", weights.gamma, b.gate_nodes.normalized, b.gate_nodes.contribution),
                    "total": b.formula(),
                },
                "result": {
                    "score": round1(result.score),
                    "classification": result.classification.priority,
                },
            })
        }
        Err(e) => json!({ "error": e.to_string() }),
    };

    Json(json!({
        "algorithm": "Yard Velocity Score (YVS)",
        "version": env!("CARGO_PKG_VERSION"),
        "purpose": "Scores logistics facilities (0-100) to identify high-value automation targets",
        "formula": "YVS = (α × Paved%) + (β × NormTrailers) + (γ × NormGates)",
        "coefficients": {
            "alpha": {
                "symbol": Component::PavedArea.symbol(),
                "value": weights.alpha,
                "weight_percent": weight_percent(weights.alpha),
                "component": "Paved Area Percentage",
                "rationale": "Paved area is the strongest predictor of yard complexity. More paved = more trailer parking = more 'Heavy Water' friction.",
            },
            "beta": {
                "symbol": Component::TrailerCount.symbol(),
                "value": weights.beta,
                "weight_percent": weight_percent(weights.beta),
                "component": "Trailer Count (normalized)",
                "rationale": "Trailer count directly correlates with throughput volume and 'Yard Hunting' risk.",
                "normalization": format!("Divided by {}, capped at 100", benchmarks.max_trailer_benchmark),
            },
            "gamma": {
                "symbol": Component::GateNodes.symbol(),
                "value": weights.gamma,
                "weight_percent": weight_percent(weights.gamma),
                "component": "Gate Nodes (normalized)",
                "rationale": "Gate complexity adds orchestration overhead but is less predictive than capacity metrics.",
                "normalization": format!("Divided by {}, capped at 100", benchmarks.max_gate_benchmark),
            },
        },
        "classifications": classifications,
        "component_interpretation": interpretation,
        "example_calculation": example_json,
    }))
}
