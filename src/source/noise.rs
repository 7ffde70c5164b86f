//! Random-offset source.
//!
//! Mimics the old mock API: every sensor reads its base value plus a uniform
//! offset. Colors and predictions are still derived by the classifier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{SensorKey, SensorMap, SensorReading};
use crate::error::TelemetryError;

use super::TelemetrySource;

/// `(base, spread)` per sensor; readings fall in `[base, base + spread)`.
fn default_band(key: SensorKey) -> (f64, f64) {
    match key {
        SensorKey::HydraulicPressure => (200.0, 50.0),
        SensorKey::HydraulicOilTemperature => (50.0, 20.0),
        SensorKey::SawBladeRpm => (1500.0, 500.0),
        SensorKey::FuelConsumption => (15.0, 5.0),
        SensorKey::BladeSharpnessLevel => (70.0, 20.0),
    }
}

#[derive(Debug)]
pub struct NoiseSource {
    rng: StdRng,
    bands: SensorMap<(f64, f64)>,
    description: String,
}

impl NoiseSource {
    /// Create a reproducible source from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bands: SensorMap::from_fn(default_band),
            description: format!("noise generator (seed {})", seed),
        }
    }
}

impl TelemetrySource for NoiseSource {
    fn sample(&mut self, _elapsed_secs: f64) -> Result<SensorReading, TelemetryError> {
        let bands = self.bands;
        Ok(SensorReading::from_fn(|key| {
            let (base, spread) = bands[key];
            base + self.rng.gen::<f64>() * spread
        }))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
