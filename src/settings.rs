//! Layered runtime settings.
//!
//! Settings are resolved from built-in defaults, an optional TOML file and
//! `HARVESTER_*` environment variables, in that order. The binary applies
//! command-line flags on top.
//!
//! ```toml
//! tick_interval = "1s"
//! history_capacity = 30
//! source = "wave"
//!
//! [bands]
//! red_low = 0.2
//! red_high = 0.8
//!
//! [sensors.Hydraulic_Pressure]
//! min = 150
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::data::history::{DEFAULT_CAPACITY, DEFAULT_EPSILON};
use crate::data::{Bands, SensorKey, SensorTable};
use crate::error::TelemetryError;
use crate::source::SourceKind;

/// Optional range override for one sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RangeOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interval between pipeline passes.
    #[serde(deserialize_with = "crate::data::duration::deserialize")]
    pub tick_interval: Duration,
    /// Points kept per sensor.
    pub history_capacity: usize,
    /// Minimum change before a new point is stored.
    pub history_epsilon: f64,
    pub source: SourceKind,
    pub noise_seed: u64,
    pub bands: Bands,
    pub sensors: BTreeMap<SensorKey, RangeOverride>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            history_capacity: DEFAULT_CAPACITY,
            history_epsilon: DEFAULT_EPSILON,
            source: SourceKind::Wave,
            noise_seed: 42,
            bands: Bands::default(),
            sensors: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, TelemetryError> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("HARVESTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    /// Build the sensor table with overrides applied.
    pub fn sensor_table(&self) -> Result<SensorTable, TelemetryError> {
        let table = self
            .sensors
            .iter()
            .fold(SensorTable::default(), |table, (key, range)| {
                table.with_range(*key, range.min, range.max)
            });
        table.validate()?;
        Ok(table)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        self.bands.validate()?;
        self.sensor_table()?;
        if self.tick_interval.is_zero() {
            return Err(TelemetryError::Config(config::ConfigError::Message(
                "tick_interval must be greater than zero".to_string(),
            )));
        }
        if !self.history_epsilon.is_finite() || self.history_epsilon < 0.0 {
            return Err(TelemetryError::Config(config::ConfigError::Message(format!(
                "history_epsilon must be a finite, non-negative number (got {})",
                self.history_epsilon
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
        assert_eq!(settings.history_capacity, 30);
        assert_eq!(settings.source, SourceKind::Wave);
        assert_eq!(settings.bands, Bands::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_toml(
            r#"
tick_interval = "250ms"
history_capacity = 60
source = "noise"
noise_seed = 7

[bands]
red_low = 0.1

[sensors.Hydraulic_Pressure]
min = 150.0
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.tick_interval, Duration::from_millis(250));
        assert_eq!(settings.history_capacity, 60);
        assert_eq!(settings.source, SourceKind::Noise);
        assert_eq!(settings.noise_seed, 7);
        assert_eq!(settings.bands.red_low, 0.1);
        assert_eq!(settings.bands.red_high, 0.8);

        let table = settings.sensor_table().unwrap();
        assert_eq!(table.get(SensorKey::HydraulicPressure).min, 150.0);
        assert_eq!(table.get(SensorKey::HydraulicPressure).max, 300.0);
    }

    #[test]
    fn inverted_sensor_range_fails_to_load() {
        let file = write_toml(
            r#"
[sensors.Fuel_Consumption]
min = 30.0
"#,
        );
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidSensorRange { .. }));
    }

    #[test]
    fn bad_interval_fails_to_load() {
        let file = write_toml(r#"tick_interval = "whenever""#);
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(TelemetryError::Config(_))
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = Settings {
            tick_interval: Duration::ZERO,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn negative_or_nan_epsilon_is_rejected() {
        for epsilon in [-0.5, f64::NAN, f64::INFINITY] {
            let settings = Settings {
                history_epsilon: epsilon,
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "accepted {}", epsilon);
        }

        let file = write_toml("history_epsilon = -1.0\n");
        assert!(Settings::load(Some(file.path())).is_err());
    }
}
