pub mod classification;
pub mod config;
pub mod engine;
pub mod factors;
pub mod validation;

pub use classification::{classify, Classification, Tier};
pub use config::*;
pub use engine::{
    analyze, compute_score, explain, explain_score, score, ComponentContribution, Measurement,
    ScoreBreakdown, ScoreResult,
};
pub use factors::{normalize, Component};
pub use validation::{validate_coordinates, validate_measurement, validate_scoring};
