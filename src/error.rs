//! Error types for the telemetry pipeline.

use thiserror::Error;

use crate::data::SensorKey;

/// Message shown in place of the dashboard while the pipeline is faulted.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch sensor data";

/// Errors raised while configuring or running the telemetry pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A tick could not produce a usable reading.
    #[error("Generation failed for {key}: {reason}")]
    GenerationFailure { key: SensorKey, reason: String },

    /// A sensor's configured range is empty or inverted.
    #[error("Invalid range for {key}: min {min} must be below max {max}")]
    InvalidSensorRange { key: SensorKey, min: f64, max: f64 },

    /// Classifier band edges are out of order.
    #[error("Invalid status bands: {0}")]
    InvalidBands(String),

    /// Settings could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
