use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{DetectionProvider, Detections, GateProvider, SegmentationProvider};

/// Returns the same measurements for every facility.
///
/// A facility whose image reference contains `fail_on` makes every provider
/// call for it fail, which is how batch failure isolation is exercised.
#[derive(Debug, Clone)]
pub struct FixedProviders {
    pub trailers: u32,
    pub tractors: u32,
    pub paved_area_pct: f64,
    pub gates: u32,
    pub fail_on: Option<String>,
}

impl FixedProviders {
    pub fn new(paved_area_pct: f64, trailers: u32, gates: u32) -> Self {
        Self {
            trailers,
            tractors: 0,
            paved_area_pct,
            gates,
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    fn check(&self, image_ref: &str) -> Result<()> {
        if let Some(ref needle) = self.fail_on {
            if image_ref.contains(needle.as_str()) {
                bail!("no imagery available for {}", image_ref);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DetectionProvider for FixedProviders {
    async fn detect(&self, image_ref: &str) -> Result<Detections> {
        self.check(image_ref)?;
        Ok(Detections {
            trailers: self.trailers,
            tractors: self.tractors,
        })
    }
}

#[async_trait]
impl SegmentationProvider for FixedProviders {
    async fn paved_area_pct(&self, image_ref: &str) -> Result<f64> {
        self.check(image_ref)?;
        Ok(self.paved_area_pct)
    }
}

#[async_trait]
impl GateProvider for FixedProviders {
    async fn gate_count(&self, _lat: f64, _lon: f64) -> Result<u32> {
        Ok(self.gates)
    }
}
