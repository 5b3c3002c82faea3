use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use super::{DetectionProvider, Detections, GateProvider, SegmentationProvider};

pub const TRAILER_RANGE: std::ops::RangeInclusive<u32> = 50..=250;
pub const TRACTOR_RANGE: std::ops::RangeInclusive<u32> = 5..=30;
pub const PAVED_RANGE: std::ops::Range<f64> = 40.0..95.0;
pub const GATE_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

fn rng_from(seed: Option<u64>) -> Mutex<StdRng> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Mutex::new(rng)
}

fn lock(rng: &Mutex<StdRng>) -> std::sync::MutexGuard<'_, StdRng> {
    // A panic mid-draw leaves the generator usable
    rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Stand-in for trailer detection and paved-surface segmentation.
pub struct MockVision {
    rng: Mutex<StdRng>,
}

impl MockVision {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: rng_from(seed) }
    }
}

#[async_trait]
impl DetectionProvider for MockVision {
    async fn detect(&self, image_ref: &str) -> Result<Detections> {
        let detections = {
            let mut rng = lock(&self.rng);
            Detections {
                trailers: rng.gen_range(TRAILER_RANGE),
                tractors: rng.gen_range(TRACTOR_RANGE),
            }
        };
        tracing::debug!(
            image = image_ref,
            trailers = detections.trailers,
            tractors = detections.tractors,
            "mock detection"
        );
        Ok(detections)
    }
}

#[async_trait]
impl SegmentationProvider for MockVision {
    async fn paved_area_pct(&self, image_ref: &str) -> Result<f64> {
        let paved = lock(&self.rng).gen_range(PAVED_RANGE);
        tracing::debug!(image = image_ref, paved = %format!("{:.1}%", paved), "mock segmentation");
        Ok(paved)
    }
}

/// Stand-in for gate detection from road network analysis.
pub struct MockGates {
    rng: Mutex<StdRng>,
}

impl MockGates {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: rng_from(seed) }
    }
}

#[async_trait]
impl GateProvider for MockGates {
    async fn gate_count(&self, lat: f64, lon: f64) -> Result<u32> {
        let gates = lock(&self.rng).gen_range(GATE_RANGE);
        tracing::debug!(lat = %format!("{:.4}", lat), lon = %format!("{:.4}", lon), gates, "mock gate detection");
        Ok(gates)
    }
}
