use serde::{Deserialize, Serialize};

/// Main scoring configuration.
///
/// Holds the weights of the three score components and the benchmarks used to
/// rescale raw counts onto a 0-100 scale. Passed explicitly to every engine call.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights: { alpha: 0.5, beta: 0.3, gamma: 0.2 }
///   benchmarks:
///     max_trailer_benchmark: 300
///     max_gate_benchmark: 5
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: Weights,

    #[serde(default)]
    pub benchmarks: Benchmarks,
}

/// Component weights. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    /// Paved area weight
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Trailer count weight
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Gate node weight
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

/// Normalization denominators. A facility at or above a benchmark scores 100 on that component.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Benchmarks {
    #[serde(default = "default_trailer_benchmark")]
    pub max_trailer_benchmark: f64,

    #[serde(default = "default_gate_benchmark")]
    pub max_gate_benchmark: f64,
}

pub const DEFAULT_ALPHA: f64 = 0.50;
pub const DEFAULT_BETA: f64 = 0.30;
pub const DEFAULT_GAMMA: f64 = 0.20;
pub const DEFAULT_MAX_TRAILER_BENCHMARK: f64 = 300.0;
pub const DEFAULT_MAX_GATE_BENCHMARK: f64 = 5.0;

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_beta() -> f64 {
    DEFAULT_BETA
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

fn default_trailer_benchmark() -> f64 {
    DEFAULT_MAX_TRAILER_BENCHMARK
}

fn default_gate_benchmark() -> f64 {
    DEFAULT_MAX_GATE_BENCHMARK
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            max_trailer_benchmark: DEFAULT_MAX_TRAILER_BENCHMARK,
            max_gate_benchmark: DEFAULT_MAX_GATE_BENCHMARK,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.alpha + self.beta + self.gamma
    }
}

impl ScoringConfig {
    /// Build a config and reject it unless every weight and benchmark is usable.
    pub fn new(weights: Weights, benchmarks: Benchmarks) -> Result<Self, crate::error::ScoringError> {
        let config = Self {
            weights,
            benchmarks,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check this config, folding all problems into one `Configuration` error.
    pub fn validate(&self) -> Result<(), crate::error::ScoringError> {
        super::validation::validate_scoring(self)
            .map_err(|errors| crate::error::ScoringError::Configuration(errors.join("; ")))
    }
}
