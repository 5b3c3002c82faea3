use super::config::ScoringConfig;
use super::engine::Measurement;
use crate::error::ScoringError;

/// Allowed drift of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let weights = &config.weights;

    for (name, value) in [
        ("alpha", weights.alpha),
        ("beta", weights.beta),
        ("gamma", weights.gamma),
    ] {
        if !value.is_finite() {
            errors.push(format!("scoring.weights.{}: must be a finite number", name));
        } else if value < 0.0 {
            errors.push(format!("scoring.weights.{}: must be non-negative", name));
        }
    }

    let sum = weights.sum();
    if sum.is_finite() && (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!(
            "scoring.weights: alpha + beta + gamma must equal 1.0 (got {})",
            sum
        ));
    }

    let benchmarks = &config.benchmarks;
    for (name, value) in [
        ("max_trailer_benchmark", benchmarks.max_trailer_benchmark),
        ("max_gate_benchmark", benchmarks.max_gate_benchmark),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!(
                "scoring.benchmarks.{}: must be a positive number (got {})",
                name, value
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reject measurements the engine would turn into NaN or an out-of-range score.
pub fn validate_measurement(measurement: &Measurement) -> Result<(), ScoringError> {
    let paved = measurement.paved_area_pct;
    if !paved.is_finite() {
        return Err(ScoringError::validation(
            "paved_area_pct",
            "must be a finite number",
        ));
    }
    if !(0.0..=100.0).contains(&paved) {
        return Err(ScoringError::validation(
            "paved_area_pct",
            format!("must be between 0 and 100 (got {})", paved),
        ));
    }
    Ok(())
}

/// Reject coordinates that cannot describe a point on the globe.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ScoringError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ScoringError::validation(
            "lat",
            format!("must be between -90 and 90 (got {})", lat),
        ));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ScoringError::validation(
            "lon",
            format!("must be between -180 and 180 (got {})", lon),
        ));
    }
    Ok(())
}
