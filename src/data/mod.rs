//! Data models and processing for harvester telemetry.
//!
//! This module turns raw sensor readings into classified, display-ready
//! snapshots and keeps a short history for charting.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of interval strings (e.g., "1s", "500ms")
//! - [`history`]: Bounded per-sensor series for charts and sparklines
//! - [`sensor`]: Sensor keys, the fixed-shape [`SensorMap`] and range configuration
//! - [`snapshot`]: The immutable per-tick [`Snapshot`]
//! - [`status`]: Threshold bands, [`StatusColor`] and [`PredictionLabel`]
//!
//! ## Data Flow
//!
//! ```text
//! SensorReading (from a TelemetrySource)
//!        │
//!        ▼
//! Snapshot::evaluate()
//!        │
//!        ├──▶ normalize() ──▶ Bands::classify() ──▶ PredictionLabel::from_statuses()
//!        │
//!        └──▶ HistoryBuffer::append() (for charts)
//! ```

pub mod duration;
pub mod history;
pub mod sensor;
pub mod snapshot;
pub mod status;

pub use history::{HistoryBuffer, HistoryPoint};
pub use sensor::{SensorConfig, SensorKey, SensorMap, SensorReading, SensorTable};
pub use snapshot::{Snapshot, StatusCounts};
pub use status::{normalize, Bands, PredictionLabel, StatusColor};
