//! Immutable per-tick view of the harvester head.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::sensor::{SensorKey, SensorMap, SensorReading, SensorTable};
use super::status::{normalize, Bands, PredictionLabel, StatusColor};

/// Everything derived from one tick: raw values, their colors and the
/// resulting prediction.
///
/// Snapshots are never mutated after construction; the driver publishes a
/// fresh one every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Tick number, starting at 1 for the first published snapshot.
    pub sequence: u64,
    /// Seconds since the driver started when the reading was generated.
    pub elapsed_secs: f64,
    pub taken_at: DateTime<Local>,
    pub reading: SensorReading,
    pub status: SensorMap<StatusColor>,
    /// Normalized position of each reading within its configured range.
    pub normalized: SensorMap<f64>,
    pub prediction: PredictionLabel,
}

/// Number of sensors in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

impl Snapshot {
    /// Classify a reading and aggregate it into a snapshot.
    pub fn evaluate(
        sequence: u64,
        elapsed_secs: f64,
        taken_at: DateTime<Local>,
        reading: SensorReading,
        sensors: &SensorTable,
        bands: &Bands,
    ) -> Self {
        let normalized = reading.map(|key, &value| normalize(sensors.get(key), value));
        let status = normalized.map(|_, &n| bands.classify(n));
        let prediction = PredictionLabel::from_statuses(status.values());

        Self {
            sequence,
            elapsed_secs,
            taken_at,
            reading,
            status,
            normalized,
            prediction,
        }
    }

    pub fn value(&self, key: SensorKey) -> f64 {
        self.reading[key]
    }

    pub fn status_of(&self, key: SensorKey) -> StatusColor {
        self.status[key]
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.status.values().fold(StatusCounts::default(), |mut counts, status| {
            match status {
                StatusColor::Green => counts.green += 1,
                StatusColor::Yellow => counts.yellow += 1,
                StatusColor::Red => counts.red += 1,
            }
            counts
        })
    }

    /// Worst color across all sensors.
    pub fn worst_status(&self) -> StatusColor {
        self.prediction.severity()
    }

    /// Display label for the history buffer.
    pub fn time_label(&self) -> String {
        self.taken_at.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(values: [f64; 5]) -> SensorReading {
        SensorReading::from_fn(|key| values[key.index()])
    }

    fn evaluate(values: [f64; 5]) -> Snapshot {
        Snapshot::evaluate(
            1,
            0.0,
            Local::now(),
            reading(values),
            &SensorTable::default(),
            &Bands::default(),
        )
    }

    #[test]
    fn nominal_reading_is_normal_operation() {
        let snapshot = evaluate([200.0, 50.0, 1500.0, 15.0, 70.0]);
        assert_eq!(snapshot.prediction, PredictionLabel::NormalOperation);
        assert_eq!(snapshot.status_counts().green, 5);
        assert_eq!(snapshot.worst_status(), StatusColor::Green);
    }

    #[test]
    fn low_pressure_requires_maintenance() {
        let snapshot = evaluate([160.0, 50.0, 1500.0, 15.0, 70.0]);
        assert_eq!(snapshot.status_of(SensorKey::HydraulicPressure), StatusColor::Red);
        assert_eq!(snapshot.prediction, PredictionLabel::MaintenanceRequired);
        assert_eq!(
            snapshot.status_counts(),
            StatusCounts {
                green: 4,
                yellow: 0,
                red: 1
            }
        );
    }

    #[test]
    fn yellow_only_recommends_maintenance() {
        // Fuel at 13.8 L/h sits at ~0.27 of its 10-24 range.
        let snapshot = evaluate([200.0, 50.0, 1500.0, 13.8, 70.0]);
        assert_eq!(snapshot.status_of(SensorKey::FuelConsumption), StatusColor::Yellow);
        assert_eq!(snapshot.prediction, PredictionLabel::MaintenanceRecommended);
    }

    #[test]
    fn normalized_values_are_kept() {
        let snapshot = evaluate([200.0, 52.5, 1700.0, 17.0, 64.5]);
        assert!((snapshot.normalized[SensorKey::HydraulicOilTemperature] - 0.5).abs() < 1e-9);
        assert!((snapshot.normalized[SensorKey::SawBladeRpm] - 0.5).abs() < 1e-9);
        assert!((snapshot.normalized[SensorKey::FuelConsumption] - 0.5).abs() < 1e-9);
        assert!((snapshot.normalized[SensorKey::BladeSharpnessLevel] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn serializes_with_wire_names() {
        let snapshot = evaluate([160.0, 50.0, 1500.0, 15.0, 70.0]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["status"]["Hydraulic_Pressure"], "red");
        assert_eq!(json["prediction"], "MaintenanceRequired");
        assert_eq!(json["sequence"], 1);
    }
}
