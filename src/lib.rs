//! # harvester-watch
//!
//! A live terminal dashboard and library for forest harvester sensor
//! telemetry.
//!
//! Every tick the driver samples five sensors, classifies each reading
//! against its operating range, folds the statuses into a maintenance
//! prediction and appends the values to a short history used for charts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(snapshots)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │ watch                                               │
//! │       ▼                                                     │
//! │  ┌─────────┐    ┌─────────┐                                 │
//! │  │ driver  │───▶│ source  │◀── WaveSource | NoiseSource     │
//! │  │ (timer) │    │ (input) │                                 │
//! │  └─────────┘    └─────────┘                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`driver`]**: [`TickDriver`] runs the pipeline on a tokio interval and
//!   publishes each [`Snapshot`]
//! - **[`source`]**: The [`TelemetrySource`] trait and the built-in generators
//! - **[`data`]**: Sensor configuration, threshold classification, snapshots and
//!   the bounded [`HistoryBuffer`]
//! - **[`settings`]**: Layered configuration (defaults, TOML file, environment)
//! - **[`app`]** and **[`ui`]**: Terminal state and ratatui rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live dashboard with the default wave generator
//! harvester-watch
//!
//! # Seeded random readings, twice a second
//! harvester-watch --source noise --seed 7 --interval 500ms
//!
//! # Run 60 ticks without a terminal and write the result as JSON
//! harvester-watch --export state.json --ticks 60
//! ```
//!
//! ### As a library
//!
//! ```
//! use harvester_watch::{PredictionLabel, SensorKey, TickDriver, WaveSource};
//!
//! let driver = TickDriver::new(Box::new(WaveSource::new()));
//! let snapshot = driver.tick_at(0.0).unwrap();
//!
//! assert_eq!(snapshot.prediction, PredictionLabel::NormalOperation);
//! assert_eq!(driver.history(SensorKey::SawBladeRpm).len(), 1);
//! ```

pub mod app;
pub mod data;
pub mod driver;
pub mod error;
pub mod events;
pub mod export;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{
    Bands, HistoryBuffer, HistoryPoint, PredictionLabel, SensorConfig, SensorKey, SensorMap,
    SensorReading, SensorTable, Snapshot, StatusColor,
};
pub use driver::{DriverState, TickDriver, TickDriverBuilder};
pub use error::{TelemetryError, FETCH_FAILED_MESSAGE};
pub use settings::Settings;
pub use source::{NoiseSource, SourceKind, TelemetrySource, WaveSource};
