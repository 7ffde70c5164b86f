//! Telemetry source abstraction.
//!
//! A source produces one [`SensorReading`] per tick. The driver feeds the
//! elapsed time since start so that time-based generators stay pure.

mod noise;
mod wave;

pub use noise::NoiseSource;
pub use wave::{WaveParams, WaveSource};

use std::fmt::Debug;

use serde::Deserialize;

use crate::data::SensorReading;
use crate::error::TelemetryError;

/// Trait for producing sensor readings.
///
/// Implementations must not block: the driver calls `sample` on its timer
/// path while holding the pipeline lock.
///
/// # Example
///
/// ```
/// use harvester_watch::{TelemetrySource, WaveSource};
///
/// let mut source = WaveSource::new();
/// let reading = source.sample(5.0).unwrap();
/// assert!(reading.ensure_finite().is_ok());
/// ```
pub trait TelemetrySource: Send + Debug {
    /// Produce the reading for `elapsed_secs` seconds after the driver started.
    fn sample(&mut self, elapsed_secs: f64) -> Result<SensorReading, TelemetryError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Which built-in source to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Deterministic sine waves around each sensor's nominal value.
    #[default]
    Wave,
    /// Uniform random offsets above each sensor's base value.
    Noise,
}

impl SourceKind {
    /// Instantiate the source. `seed` only affects [`SourceKind::Noise`].
    pub fn build(self, seed: u64) -> Box<dyn TelemetrySource> {
        match self {
            SourceKind::Wave => Box::new(WaveSource::new()),
            SourceKind::Noise => Box::new(NoiseSource::seeded(seed)),
        }
    }
}
