use serde::{Deserialize, Serialize};

use super::classification::{classify, Classification};
use super::config::ScoringConfig;
use super::factors::{normalize, Component};
use super::validation::validate_measurement;
use crate::error::ScoringError;

/// Largest difference tolerated between a caller's score and the recomputed total.
const CONSISTENCY_EPSILON: f64 = 1e-9;

/// Raw inputs of the Yard Velocity Score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Measurement {
    /// Share of the footprint that is paved, 0-100
    pub paved_area_pct: f64,
    pub trailer_count: u32,
    pub gate_count: u32,
}

impl Measurement {
    pub fn new(paved_area_pct: f64, trailer_count: u32, gate_count: u32) -> Self {
        Self {
            paved_area_pct,
            trailer_count,
            gate_count,
        }
    }
}

/// How one component fed into the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentContribution {
    pub component: Component,
    pub raw_value: f64,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
    pub interpretation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total_score: f64,
    pub paved_area: ComponentContribution,
    pub trailer_count: ComponentContribution,
    pub gate_nodes: ComponentContribution,
}

impl ScoreBreakdown {
    pub fn components(&self) -> [&ComponentContribution; 3] {
        [&self.paved_area, &self.trailer_count, &self.gate_nodes]
    }

    /// Render the weighted sum, e.g. `(0.5 × 85.0) + (0.3 × 60.0) + (0.2 × 60.0) = 72.5`
    pub fn formula(&self) -> String {
        let terms: Vec<String> = self
            .components()
            .iter()
            .map(|c| format!("({} × {:.1})", c.weight, c.normalized))
            .collect();
        format!("{} = {:.1}", terms.join(" + "), self.total_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub classification: Classification,
    pub breakdown: ScoreBreakdown,
}

/// Normalized components and their weighted contributions. Both the score and
/// the breakdown are read off this one value.
struct Normalized {
    paved: ComponentContribution,
    trailers: ComponentContribution,
    gates: ComponentContribution,
}

impl Normalized {
    fn total(&self) -> f64 {
        self.paved.contribution + self.trailers.contribution + self.gates.contribution
    }
}

fn contribution(component: Component, raw_value: f64, normalized: f64, weight: f64) -> ComponentContribution {
    ComponentContribution {
        component,
        raw_value,
        normalized,
        weight,
        contribution: weight * normalized,
        interpretation: component.interpret(raw_value),
    }
}

fn normalize_inputs(
    paved_area_pct: f64,
    trailer_count: u32,
    gate_count: u32,
    config: &ScoringConfig,
) -> Normalized {
    let weights = &config.weights;
    let benchmarks = &config.benchmarks;
    let trailers = f64::from(trailer_count);
    let gates = f64::from(gate_count);

    Normalized {
        // Paved area is already on a 0-100 scale and passes through as-is
        paved: contribution(Component::PavedArea, paved_area_pct, paved_area_pct, weights.alpha),
        trailers: contribution(
            Component::TrailerCount,
            trailers,
            normalize(trailers, benchmarks.max_trailer_benchmark),
            weights.beta,
        ),
        gates: contribution(
            Component::GateNodes,
            gates,
            normalize(gates, benchmarks.max_gate_benchmark),
            weights.gamma,
        ),
    }
}

/// Weighted sum of the normalized components. Pure; does not validate.
pub fn compute_score(
    paved_area_pct: f64,
    trailer_count: u32,
    gate_count: u32,
    config: &ScoringConfig,
) -> f64 {
    normalize_inputs(paved_area_pct, trailer_count, gate_count, config).total()
}

/// Validate a measurement and score it.
pub fn score(measurement: &Measurement, config: &ScoringConfig) -> Result<f64, ScoringError> {
    validate_measurement(measurement)?;
    Ok(compute_score(
        measurement.paved_area_pct,
        measurement.trailer_count,
        measurement.gate_count,
        config,
    ))
}

/// Per-component breakdown of a measurement's score.
pub fn explain(measurement: &Measurement, config: &ScoringConfig) -> ScoreBreakdown {
    let normalized = normalize_inputs(
        measurement.paved_area_pct,
        measurement.trailer_count,
        measurement.gate_count,
        config,
    );
    ScoreBreakdown {
        total_score: normalized.total(),
        paved_area: normalized.paved,
        trailer_count: normalized.trailers,
        gate_nodes: normalized.gates,
    }
}

/// Breakdown of a score the caller already holds. Fails if `score` is not what
/// `measurement` produces under `config`.
pub fn explain_score(
    measurement: &Measurement,
    score: f64,
    config: &ScoringConfig,
) -> Result<ScoreBreakdown, ScoringError> {
    let breakdown = explain(measurement, config);
    if (breakdown.total_score - score).abs() > CONSISTENCY_EPSILON || score.is_nan() {
        return Err(ScoringError::Inconsistent {
            given: score,
            recomputed: breakdown.total_score,
        });
    }
    Ok(breakdown)
}

/// Validate, score, classify and explain in one pass.
pub fn analyze(measurement: &Measurement, config: &ScoringConfig) -> Result<ScoreResult, ScoringError> {
    validate_measurement(measurement)?;
    let breakdown = explain(measurement, config);
    let score = breakdown.total_score;
    Ok(ScoreResult {
        score,
        classification: classify(score),
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Benchmarks, Tier, Weights};
    use proptest::prelude::*;

    fn defaults() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn test_all_zero_scores_zero() {
        assert_eq!(compute_score(0.0, 0, 0, &defaults()), 0.0);
    }

    #[test]
    fn test_benchmarks_score_100() {
        assert_eq!(compute_score(100.0, 300, 5, &defaults()), 100.0);
    }

    #[test]
    fn test_counts_above_benchmark_are_capped() {
        assert_eq!(compute_score(100.0, 10_000, 50, &defaults()), 100.0);
    }

    #[test]
    fn test_reference_example() {
        let m = Measurement::new(85.0, 180, 3);
        let result = analyze(&m, &defaults()).unwrap();

        assert!((result.breakdown.trailer_count.normalized - 60.0).abs() < 1e-9);
        assert!((result.breakdown.gate_nodes.normalized - 60.0).abs() < 1e-9);
        assert!((result.breakdown.paved_area.contribution - 42.5).abs() < 1e-9);
        assert!((result.breakdown.trailer_count.contribution - 18.0).abs() < 1e-9);
        assert!((result.breakdown.gate_nodes.contribution - 12.0).abs() < 1e-9);
        assert!((result.score - 72.5).abs() < 1e-9);
        assert_eq!(result.classification.tier, Tier::Standard);
    }

    #[test]
    fn test_paved_passes_through_unclamped() {
        // The engine itself does not clamp; `score` rejects it at the boundary instead
        let raw = compute_score(120.0, 0, 0, &defaults());
        assert!((raw - 60.0).abs() < 1e-9);

        let err = score(&Measurement::new(120.0, 0, 0), &defaults()).unwrap_err();
        assert!(matches!(err, ScoringError::Validation { field: "paved_area_pct", .. }));
    }

    #[test]
    fn test_custom_config_override() {
        let config = ScoringConfig {
            weights: Weights {
                alpha: 0.0,
                beta: 1.0,
                gamma: 0.0,
            },
            benchmarks: Benchmarks {
                max_trailer_benchmark: 100.0,
                max_gate_benchmark: 5.0,
            },
        };
        let s = compute_score(90.0, 50, 5, &config);
        assert!((s - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let config = defaults();
        let first = compute_score(63.2, 117, 2, &config);
        for _ in 0..100 {
            assert_eq!(compute_score(63.2, 117, 2, &config), first);
        }
    }

    #[test]
    fn test_breakdown_interpretations() {
        let breakdown = explain(&Measurement::new(85.0, 180, 3), &defaults());
        assert_eq!(
            breakdown.paved_area.interpretation,
            "Standard DC - Good operational footprint"
        );
        assert_eq!(
            breakdown.trailer_count.interpretation,
            "High-volume facility - Significant throughput"
        );
        assert_eq!(
            breakdown.gate_nodes.interpretation,
            "Standard facility - Some traffic separation"
        );
    }

    #[test]
    fn test_breakdown_formula() {
        let breakdown = explain(&Measurement::new(85.0, 180, 3), &defaults());
        assert_eq!(
            breakdown.formula(),
            "(0.5 × 85.0) + (0.3 × 60.0) + (0.2 × 60.0) = 72.5"
        );
    }

    #[test]
    fn test_explain_score_accepts_matching_score() {
        let m = Measurement::new(70.0, 90, 4);
        let s = score(&m, &defaults()).unwrap();
        let breakdown = explain_score(&m, s, &defaults()).unwrap();
        assert_eq!(breakdown.total_score, s);
    }

    #[test]
    fn test_explain_score_rejects_mismatch() {
        let m = Measurement::new(70.0, 90, 4);
        let err = explain_score(&m, 99.0, &defaults()).unwrap_err();
        assert!(matches!(err, ScoringError::Inconsistent { given, .. } if given == 99.0));
    }

    #[test]
    fn test_analyze_rejects_nan() {
        assert!(analyze(&Measurement::new(f64::NAN, 10, 1), &defaults()).is_err());
    }

    proptest! {
        #[test]
        fn prop_normalize_bounded(value in 0.0f64..1e9, benchmark in 1e-3f64..1e6) {
            let n = normalize(value, benchmark);
            prop_assert!((0.0..=100.0).contains(&n));
        }

        #[test]
        fn prop_weighted_sum_identity(paved in 0.0f64..=100.0, trailers in 0u32..1000, gates in 0u32..20) {
            let config = defaults();
            let w = config.weights;
            let b = config.benchmarks;
            let norm_t = normalize(f64::from(trailers), b.max_trailer_benchmark);
            let norm_g = normalize(f64::from(gates), b.max_gate_benchmark);
            let expected = w.alpha * paved + w.beta * norm_t + w.gamma * norm_g;
            prop_assert_eq!(compute_score(paved, trailers, gates, &config), expected);
        }

        #[test]
        fn prop_score_in_range(paved in 0.0f64..=100.0, trailers in 0u32..100_000, gates in 0u32..100) {
            let s = compute_score(paved, trailers, gates, &defaults());
            prop_assert!(s >= 0.0 && s <= 100.0 + 1e-9);
        }

        #[test]
        fn prop_monotonic_paved(a in 0.0f64..=100.0, b in 0.0f64..=100.0, trailers in 0u32..400, gates in 0u32..8) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let config = defaults();
            prop_assert!(compute_score(lo, trailers, gates, &config) <= compute_score(hi, trailers, gates, &config));
        }

        #[test]
        fn prop_monotonic_trailers(paved in 0.0f64..=100.0, a in 0u32..400, b in 0u32..400, gates in 0u32..8) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let config = defaults();
            prop_assert!(compute_score(paved, lo, gates, &config) <= compute_score(paved, hi, gates, &config));
        }

        #[test]
        fn prop_monotonic_gates(paved in 0.0f64..=100.0, trailers in 0u32..400, a in 0u32..8, b in 0u32..8) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let config = defaults();
            prop_assert!(compute_score(paved, trailers, lo, &config) <= compute_score(paved, trailers, hi, &config));
        }

        #[test]
        fn prop_breakdown_matches_score(paved in 0.0f64..=100.0, trailers in 0u32..400, gates in 0u32..8) {
            let config = defaults();
            let m = Measurement::new(paved, trailers, gates);
            let s = score(&m, &config).unwrap();
            prop_assert_eq!(explain(&m, &config).total_score, s);
        }
    }
}
