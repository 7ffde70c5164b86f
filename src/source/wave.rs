//! Deterministic sine-wave source.

use crate::data::{SensorKey, SensorMap, SensorReading};
use crate::error::TelemetryError;

use super::TelemetrySource;

/// Shape of the wave for one sensor: `base + amplitude * sin(t * freq)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub base: f64,
    pub amplitude: f64,
    pub freq: f64,
}

impl WaveParams {
    pub const fn new(base: f64, amplitude: f64, freq: f64) -> Self {
        Self {
            base,
            amplitude,
            freq,
        }
    }

    pub fn value_at(&self, t: f64) -> f64 {
        self.base + self.amplitude * (t * self.freq).sin()
    }
}

fn default_params(key: SensorKey) -> WaveParams {
    match key {
        SensorKey::HydraulicPressure => WaveParams::new(200.0, 25.0, 1.0),
        SensorKey::HydraulicOilTemperature => WaveParams::new(50.0, 10.0, 0.5),
        SensorKey::SawBladeRpm => WaveParams::new(1500.0, 250.0, 0.3),
        SensorKey::FuelConsumption => WaveParams::new(15.0, 2.5, 0.2),
        SensorKey::BladeSharpnessLevel => WaveParams::new(70.0, 10.0, 0.1),
    }
}

/// A source whose reading is a pure function of elapsed time.
///
/// Each sensor oscillates around its nominal value at its own frequency, so
/// the slow sensors (fuel, sharpness) drift while pressure swings every few
/// seconds.
#[derive(Debug, Clone)]
pub struct WaveSource {
    params: SensorMap<WaveParams>,
}

impl Default for WaveSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveSource {
    pub fn new() -> Self {
        Self {
            params: SensorMap::from_fn(default_params),
        }
    }

    /// Replace the wave for one sensor.
    pub fn with_params(mut self, key: SensorKey, params: WaveParams) -> Self {
        self.params[key] = params;
        self
    }

    /// The reading at `t` seconds.
    pub fn reading_at(&self, t: f64) -> SensorReading {
        self.params.map(|_, params| params.value_at(t))
    }
}

impl TelemetrySource for WaveSource {
    fn sample(&mut self, elapsed_secs: f64) -> Result<SensorReading, TelemetryError> {
        Ok(self.reading_at(elapsed_secs))
    }

    fn description(&self) -> &str {
        "wave generator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_is_deterministic() {
        let source = WaveSource::new();
        assert_eq!(source.reading_at(5.0), source.reading_at(5.0));
        assert_eq!(source.reading_at(5.0), WaveSource::new().reading_at(5.0));
    }

    #[test]
    fn starts_at_base_values() {
        let reading = WaveSource::new().reading_at(0.0);
        assert_eq!(reading[SensorKey::HydraulicPressure], 200.0);
        assert_eq!(reading[SensorKey::HydraulicOilTemperature], 50.0);
        assert_eq!(reading[SensorKey::SawBladeRpm], 1500.0);
        assert_eq!(reading[SensorKey::FuelConsumption], 15.0);
        assert_eq!(reading[SensorKey::BladeSharpnessLevel], 70.0);
    }

    #[test]
    fn follows_sine_formula() {
        let t = 5.0_f64;
        let reading = WaveSource::new().reading_at(t);
        let expected = 1500.0 + 250.0 * (t * 0.3).sin();
        assert!((reading[SensorKey::SawBladeRpm] - expected).abs() < 1e-9);
        let expected = 200.0 + 25.0 * t.sin();
        assert!((reading[SensorKey::HydraulicPressure] - expected).abs() < 1e-9);
    }

    #[test]
    fn stays_within_amplitude() {
        let source = WaveSource::new();
        for step in 0..200 {
            let reading = source.reading_at(step as f64 * 0.37);
            let pressure = reading[SensorKey::HydraulicPressure];
            assert!((175.0..=225.0).contains(&pressure));
        }
    }

    #[test]
    fn params_can_be_overridden() {
        let source = WaveSource::new()
            .with_params(SensorKey::FuelConsumption, WaveParams::new(30.0, 0.0, 1.0));
        assert_eq!(source.reading_at(3.0)[SensorKey::FuelConsumption], 30.0);
    }

    #[test]
    fn sample_never_fails() {
        let mut source = WaveSource::new();
        assert!(source.sample(1234.5).is_ok());
        assert_eq!(source.description(), "wave generator");
    }
}
