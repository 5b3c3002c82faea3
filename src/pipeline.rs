use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::cmp::Ordering;

use crate::error::AnalysisError;
use crate::facility::Facility;
use crate::providers::Providers;
use crate::scoring::{
    analyze, validate_coordinates, Classification, Measurement, ScoreResult, ScoringConfig, Tier,
};

/// Outcome of analyzing one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityReport {
    pub facility: Facility,
    pub measurement: Measurement,
    pub tractors: u32,
    pub result: ScoreResult,
}

impl FacilityReport {
    pub fn score(&self) -> f64 {
        self.result.score
    }

    pub fn classification(&self) -> &Classification {
        &self.result.classification
    }
}

/// A facility that could not be analyzed. `index` is its position in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityFailure {
    pub index: usize,
    pub name: String,
    pub error: String,
}

/// Facility counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub whales: usize,
    pub standard: usize,
    pub low: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FacilityReport]) -> Self {
        reports.iter().fold(Summary::default(), |mut acc, r| {
            match r.classification().tier {
                Tier::Whale => acc.whales += 1,
                Tier::Standard => acc.standard += 1,
                Tier::Low => acc.low += 1,
            }
            acc
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Successful analyses, highest score first
    pub ranked: Vec<FacilityReport>,
    /// Failed analyses, in input order
    pub failures: Vec<FacilityFailure>,
}

impl BatchOutcome {
    pub fn summary(&self) -> Summary {
        Summary::from_reports(&self.ranked)
    }

    pub fn top_target(&self) -> Option<&FacilityReport> {
        self.ranked.first()
    }

    pub fn total(&self) -> usize {
        self.ranked.len() + self.failures.len()
    }
}

/// Run the full pipeline on one facility: query the providers, then score,
/// classify and explain.
pub async fn analyze_facility(
    facility: &Facility,
    providers: &Providers,
    config: &ScoringConfig,
) -> Result<FacilityReport, AnalysisError> {
    validate_coordinates(facility.lat, facility.lon)?;

    let image_ref = facility.image_ref();
    tracing::debug!(
        facility = %facility.name,
        lat = facility.lat,
        lon = facility.lon,
        image = %image_ref,
        "scanning facility"
    );

    let detections = providers
        .detection
        .detect(&image_ref)
        .await
        .map_err(|source| AnalysisError::Provider {
            provider: "detection",
            source,
        })?;
    let paved_area_pct = providers
        .segmentation
        .paved_area_pct(&image_ref)
        .await
        .map_err(|source| AnalysisError::Provider {
            provider: "segmentation",
            source,
        })?;
    let gate_count = providers
        .gates
        .gate_count(facility.lat, facility.lon)
        .await
        .map_err(|source| AnalysisError::Provider {
            provider: "gate",
            source,
        })?;

    let measurement = Measurement::new(paved_area_pct, detections.trailers, gate_count);
    let result = analyze(&measurement, config)?;

    tracing::info!(
        facility = %facility.name,
        score = %format!("{:.1}", result.score),
        tier = result.classification.label,
        trailers = measurement.trailer_count,
        paved = %format!("{:.1}%", measurement.paved_area_pct),
        gates = measurement.gate_count,
        "facility scored"
    );

    Ok(FacilityReport {
        facility: facility.clone(),
        measurement,
        tractors: detections.tractors,
        result,
    })
}

/// Analyze every facility concurrently. A failing facility is recorded and
/// does not stop the others. Reports come back ranked by score descending,
/// ties kept in input order.
pub async fn run_batch(
    facilities: &[Facility],
    providers: &Providers,
    config: &ScoringConfig,
) -> BatchOutcome {
    let mut futures = FuturesUnordered::new();
    for (index, facility) in facilities.iter().enumerate() {
        futures.push(async move {
            let result = analyze_facility(facility, providers, config).await;
            (index, facility, result)
        });
    }

    let mut scored = Vec::with_capacity(facilities.len());
    let mut failures = Vec::new();

    while let Some((index, facility, result)) = futures.next().await {
        match result {
            Ok(report) => scored.push((index, report)),
            Err(e) => {
                tracing::warn!(facility = %facility.name, error = %e, "facility analysis failed");
                failures.push(FacilityFailure {
                    index,
                    name: facility.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    failures.sort_by_key(|f| f.index);

    BatchOutcome {
        ranked: rank(scored),
        failures,
    }
}

/// Sort by score descending; equal scores keep input order.
pub fn rank(mut scored: Vec<(usize, FacilityReport)>) -> Vec<FacilityReport> {
    scored.sort_by(|a, b| {
        let score_cmp = b.1.score().partial_cmp(&a.1.score()).unwrap_or(Ordering::Equal);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }
        a.0.cmp(&b.0)
    });
    scored.into_iter().map(|(_, report)| report).collect()
}
