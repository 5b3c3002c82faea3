use thiserror::Error;

/// Errors raised by the scoring engine and its boundary checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A caller-supplied value is outside its documented domain.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Weights or benchmarks are unusable. Detected when the config is built or loaded.
    #[error("invalid scoring configuration: {0}")]
    Configuration(String),

    /// `explain_score` was handed a score that the measurement does not produce.
    #[error("breakdown total {recomputed:.3} does not match score {given:.3}")]
    Inconsistent { given: f64, recomputed: f64 },
}

impl ScoringError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ScoringError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure to analyze a single facility.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("{provider} provider failed: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: anyhow::Error,
    },
}
