//! Sensor identities and their static display/range configuration.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TelemetryError;

/// One of the five sensors mounted on the harvester head.
///
/// The set is closed: every [`SensorMap`] holds exactly one entry per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorKey {
    HydraulicPressure,
    HydraulicOilTemperature,
    SawBladeRpm,
    FuelConsumption,
    BladeSharpnessLevel,
}

impl SensorKey {
    /// All keys in display order.
    pub const ALL: [SensorKey; 5] = [
        SensorKey::HydraulicPressure,
        SensorKey::HydraulicOilTemperature,
        SensorKey::SawBladeRpm,
        SensorKey::FuelConsumption,
        SensorKey::BladeSharpnessLevel,
    ];

    /// Position of this key inside [`SensorKey::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used on the wire and in settings files.
    pub fn wire_name(self) -> &'static str {
        match self {
            SensorKey::HydraulicPressure => "Hydraulic_Pressure",
            SensorKey::HydraulicOilTemperature => "Hydraulic_Oil_Temperature",
            SensorKey::SawBladeRpm => "Saw_Blade_RPM",
            SensorKey::FuelConsumption => "Fuel_Consumption",
            SensorKey::BladeSharpnessLevel => "Blade_Sharpness_Level",
        }
    }

    /// Cycle to the next key (wraps around).
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous key (wraps around).
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Parses wire names case-insensitively.
///
/// Layered configuration may lowercase keys (environment variables in
/// particular), so `hydraulic_pressure` is accepted as well.
impl FromStr for SensorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKey::ALL
            .into_iter()
            .find(|key| key.wire_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sensor: {}", s))
    }
}

impl Serialize for SensorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for SensorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A total mapping from [`SensorKey`] to `T`.
///
/// Stored as a fixed array so that a missing key is unrepresentable.
/// Serializes as a JSON object keyed by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorMap<T> {
    values: [T; 5],
}

impl<T> SensorMap<T> {
    /// Build a map by evaluating `f` for every key.
    pub fn from_fn(mut f: impl FnMut(SensorKey) -> T) -> Self {
        Self {
            values: SensorKey::ALL.map(&mut f),
        }
    }

    /// Iterate `(key, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorKey, &T)> {
        SensorKey::ALL.into_iter().zip(self.values.iter())
    }

    /// Iterate values in display order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Transform every value, keeping the keys.
    pub fn map<U>(&self, mut f: impl FnMut(SensorKey, &T) -> U) -> SensorMap<U> {
        SensorMap::from_fn(|key| f(key, &self.values[key.index()]))
    }
}

impl<T> Index<SensorKey> for SensorMap<T> {
    type Output = T;

    fn index(&self, key: SensorKey) -> &T {
        &self.values[key.index()]
    }
}

impl<T> IndexMut<SensorKey> for SensorMap<T> {
    fn index_mut(&mut self, key: SensorKey) -> &mut T {
        &mut self.values[key.index()]
    }
}

impl<T: Serialize> Serialize for SensorMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.wire_name(), value)?;
        }
        map.end()
    }
}

/// One value per sensor, taken at a single tick.
pub type SensorReading = SensorMap<f64>;

impl SensorReading {
    /// Reject readings containing NaN or infinite values.
    pub fn ensure_finite(&self) -> Result<(), TelemetryError> {
        match self.iter().find(|(_, value)| !value.is_finite()) {
            Some((key, value)) => Err(TelemetryError::GenerationFailure {
                key,
                reason: format!("non-finite value {}", value),
            }),
            None => Ok(()),
        }
    }
}

/// Display and range configuration for one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorConfig {
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    /// Hex display color, e.g. `#4CAF50`.
    pub color: &'static str,
    pub description: &'static str,
}

impl SensorConfig {
    /// Width of the configured operating range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Factory configuration for every sensor.
pub fn default_config(key: SensorKey) -> SensorConfig {
    match key {
        SensorKey::HydraulicPressure => SensorConfig {
            label: "Hydraulic Pressure",
            unit: "bar",
            min: 145.0,
            max: 300.0,
            color: "#4CAF50",
            description: "Monitors the hydraulic system pressure for optimal cutting performance",
        },
        SensorKey::HydraulicOilTemperature => SensorConfig {
            label: "Oil Temperature",
            unit: "°C",
            min: 20.0,
            max: 85.0,
            color: "#FF5252",
            description: "Tracks hydraulic oil temperature to prevent system overheating",
        },
        SensorKey::SawBladeRpm => SensorConfig {
            label: "Blade RPM",
            unit: "RPM",
            min: 700.0,
            max: 2700.0,
            color: "#2196F3",
            description: "Measures saw blade rotation speed for efficient cutting",
        },
        SensorKey::FuelConsumption => SensorConfig {
            label: "Fuel Usage",
            unit: "L/h",
            min: 10.0,
            max: 24.0,
            color: "#FFC107",
            description: "Monitors fuel consumption rate for efficiency tracking",
        },
        SensorKey::BladeSharpnessLevel => SensorConfig {
            label: "Blade Sharpness",
            unit: "%",
            min: 29.0,
            max: 100.0,
            color: "#9C27B0",
            description: "Indicates saw blade sharpness level for maintenance planning",
        },
    }
}

/// The configuration table for all five sensors.
///
/// Immutable once handed to a driver. Construct with [`SensorTable::default`]
/// and adjust ranges with [`SensorTable::with_range`] before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorTable {
    configs: SensorMap<SensorConfig>,
}

impl Default for SensorTable {
    fn default() -> Self {
        Self {
            configs: SensorMap::from_fn(default_config),
        }
    }
}

impl SensorTable {
    /// Override the operating range of one sensor.
    ///
    /// The table is not checked here; call [`SensorTable::validate`] once all
    /// overrides are applied.
    pub fn with_range(mut self, key: SensorKey, min: Option<f64>, max: Option<f64>) -> Self {
        let config = &mut self.configs[key];
        if let Some(min) = min {
            config.min = min;
        }
        if let Some(max) = max {
            config.max = max;
        }
        self
    }

    /// Check that `min < max` holds for every sensor.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        for (key, config) in self.configs.iter() {
            // Negated so that NaN bounds are rejected too.
            if !(config.min < config.max) {
                return Err(TelemetryError::InvalidSensorRange {
                    key,
                    min: config.min,
                    max: config.max,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: SensorKey) -> &SensorConfig {
        &self.configs[key]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorKey, &SensorConfig)> {
        self.configs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert!(SensorTable::default().validate().is_ok());
    }

    #[test]
    fn default_ranges_match_factory_values() {
        let table = SensorTable::default();
        let pressure = table.get(SensorKey::HydraulicPressure);
        assert_eq!(pressure.min, 145.0);
        assert_eq!(pressure.max, 300.0);
        assert_eq!(pressure.unit, "bar");
        assert_eq!(table.get(SensorKey::BladeSharpnessLevel).label, "Blade Sharpness");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let table =
            SensorTable::default().with_range(SensorKey::FuelConsumption, Some(30.0), None);
        let err = table.validate().unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::InvalidSensorRange {
                key: SensorKey::FuelConsumption,
                ..
            }
        ));
    }

    #[test]
    fn equal_bounds_are_rejected() {
        let table =
            SensorTable::default().with_range(SensorKey::SawBladeRpm, Some(900.0), Some(900.0));
        assert!(table.validate().is_err());
    }

    #[test]
    fn key_parses_case_insensitively() {
        assert_eq!("Saw_Blade_RPM".parse::<SensorKey>(), Ok(SensorKey::SawBladeRpm));
        assert_eq!("saw_blade_rpm".parse::<SensorKey>(), Ok(SensorKey::SawBladeRpm));
        assert!("Chain_Tension".parse::<SensorKey>().is_err());
    }

    #[test]
    fn key_cycling_wraps() {
        assert_eq!(SensorKey::BladeSharpnessLevel.next(), SensorKey::HydraulicPressure);
        assert_eq!(SensorKey::HydraulicPressure.prev(), SensorKey::BladeSharpnessLevel);
    }

    #[test]
    fn sensor_map_serializes_with_wire_names() {
        let reading = SensorReading::from_fn(|key| key.index() as f64);
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json["Hydraulic_Pressure"], 0.0);
        assert_eq!(json["Blade_Sharpness_Level"], 4.0);
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn ensure_finite_flags_nan() {
        let mut reading = SensorReading::from_fn(|_| 1.0);
        assert!(reading.ensure_finite().is_ok());

        reading[SensorKey::HydraulicOilTemperature] = f64::NAN;
        let err = reading.ensure_finite().unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::GenerationFailure {
                key: SensorKey::HydraulicOilTemperature,
                ..
            }
        ));
    }
}
