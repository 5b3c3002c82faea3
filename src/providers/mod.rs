//! Data sources feeding the scoring engine.
//!
//! The engine only needs three numbers per facility. Where they come from is
//! hidden behind these traits so the random stand-ins can be swapped for real
//! vision and geospatial services, or for fixed values in tests.

pub mod fixed;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub use fixed::FixedProviders;
pub use mock::{MockGates, MockVision};

/// Object detection output for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detections {
    pub trailers: u32,
    /// Auxiliary count; not used by the score
    pub tractors: u32,
}

#[async_trait]
pub trait DetectionProvider: Send + Sync {
    async fn detect(&self, image_ref: &str) -> Result<Detections>;
}

#[async_trait]
pub trait SegmentationProvider: Send + Sync {
    /// Paved share of the image footprint, intended range 0-100
    async fn paved_area_pct(&self, image_ref: &str) -> Result<f64>;
}

#[async_trait]
pub trait GateProvider: Send + Sync {
    async fn gate_count(&self, lat: f64, lon: f64) -> Result<u32>;
}

/// The three data sources a facility analysis needs.
#[derive(Clone)]
pub struct Providers {
    pub detection: Arc<dyn DetectionProvider>,
    pub segmentation: Arc<dyn SegmentationProvider>,
    pub gates: Arc<dyn GateProvider>,
}

impl Providers {
    /// Random stand-ins. A seed makes every run reproducible.
    pub fn mock(seed: Option<u64>) -> Self {
        let vision = Arc::new(MockVision::new(seed));
        // Offset so gate draws are not correlated with vision draws
        let gates = Arc::new(MockGates::new(seed.map(|s| s.wrapping_add(1))));
        Self {
            detection: vision.clone(),
            segmentation: vision,
            gates,
        }
    }

    pub fn fixed(fixed: FixedProviders) -> Self {
        let fixed = Arc::new(fixed);
        Self {
            detection: fixed.clone(),
            segmentation: fixed.clone(),
            gates: fixed,
        }
    }
}
