//! Threshold classification and maintenance prediction.
//!
//! A reading is rescaled into its sensor's configured range and compared
//! against fixed bands near both ends of that range. The five per-sensor
//! colors then reduce to a single [`PredictionLabel`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::sensor::SensorConfig;
use crate::error::TelemetryError;

/// Traffic-light status of a single sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    /// Short label for table cells.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusColor::Green => "OK",
            StatusColor::Yellow => "WARN",
            StatusColor::Red => "CRIT",
        }
    }
}

/// Band edges on the normalized scale.
///
/// A normalized value strictly below `red_low` or strictly above `red_high`
/// is red; otherwise strictly below `yellow_low` or above `yellow_high` is
/// yellow; everything else is green.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bands {
    pub red_low: f64,
    pub yellow_low: f64,
    pub yellow_high: f64,
    pub red_high: f64,
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            red_low: 0.2,
            yellow_low: 0.3,
            yellow_high: 0.7,
            red_high: 0.8,
        }
    }
}

impl Bands {
    /// Check `0 <= red_low <= yellow_low <= yellow_high <= red_high <= 1`.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        let edges = [
            0.0,
            self.red_low,
            self.yellow_low,
            self.yellow_high,
            self.red_high,
            1.0,
        ];
        if edges.windows(2).all(|pair| pair[0] <= pair[1]) {
            Ok(())
        } else {
            Err(TelemetryError::InvalidBands(format!(
                "expected 0 <= {} <= {} <= {} <= {} <= 1",
                self.red_low, self.yellow_low, self.yellow_high, self.red_high
            )))
        }
    }

    /// Classify an already-normalized value.
    ///
    /// Total over every `f64`; values outside `[0, 1]` are not clamped and
    /// land in the red band. NaN fails every comparison and reads as green,
    /// which is why readings are checked for finiteness before they get here.
    pub fn classify(&self, normalized: f64) -> StatusColor {
        if normalized < self.red_low || normalized > self.red_high {
            StatusColor::Red
        } else if normalized < self.yellow_low || normalized > self.yellow_high {
            StatusColor::Yellow
        } else {
            StatusColor::Green
        }
    }
}

/// Rescale `value` into `[0, 1]` relative to the sensor's range.
///
/// Values outside the range map outside `[0, 1]`.
pub fn normalize(config: &SensorConfig, value: f64) -> f64 {
    (value - config.min) / config.span()
}

/// Overall maintenance outlook derived from the per-sensor colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PredictionLabel {
    NormalOperation,
    MaintenanceRecommended,
    MaintenanceRequired,
}

impl PredictionLabel {
    /// Any red wins, then any yellow, otherwise normal.
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a StatusColor>) -> Self {
        match statuses.into_iter().copied().max() {
            Some(StatusColor::Red) => PredictionLabel::MaintenanceRequired,
            Some(StatusColor::Yellow) => PredictionLabel::MaintenanceRecommended,
            _ => PredictionLabel::NormalOperation,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PredictionLabel::NormalOperation => "Normal Operation",
            PredictionLabel::MaintenanceRecommended => "Maintenance Recommended",
            PredictionLabel::MaintenanceRequired => "Maintenance Required",
        }
    }

    /// Longer explanation for the alert banner.
    pub fn explanation(&self) -> &'static str {
        match self {
            PredictionLabel::NormalOperation => "All systems operating within normal parameters",
            PredictionLabel::MaintenanceRecommended => {
                "Some parameters approaching critical levels"
            }
            PredictionLabel::MaintenanceRequired => {
                "Critical parameters detected - immediate attention needed"
            }
        }
    }

    /// The status color this prediction is drawn with.
    pub fn severity(&self) -> StatusColor {
        match self {
            PredictionLabel::NormalOperation => StatusColor::Green,
            PredictionLabel::MaintenanceRecommended => StatusColor::Yellow,
            PredictionLabel::MaintenanceRequired => StatusColor::Red,
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sensor::{default_config, SensorKey};

    const ALL_COLORS: [StatusColor; 3] =
        [StatusColor::Green, StatusColor::Yellow, StatusColor::Red];

    #[test]
    fn band_edges_use_strict_inequalities() {
        let bands = Bands::default();
        assert_eq!(bands.classify(0.2), StatusColor::Yellow);
        assert_eq!(bands.classify(0.3), StatusColor::Green);
        assert_eq!(bands.classify(0.7), StatusColor::Green);
        assert_eq!(bands.classify(0.8), StatusColor::Yellow);
    }

    #[test]
    fn classify_interior_points() {
        let bands = Bands::default();
        assert_eq!(bands.classify(0.5), StatusColor::Green);
        assert_eq!(bands.classify(0.25), StatusColor::Yellow);
        assert_eq!(bands.classify(0.75), StatusColor::Yellow);
        assert_eq!(bands.classify(0.1), StatusColor::Red);
        assert_eq!(bands.classify(0.9), StatusColor::Red);
    }

    #[test]
    fn out_of_range_values_are_red() {
        let bands = Bands::default();
        for key in SensorKey::ALL {
            let config = default_config(key);
            let below = normalize(&config, config.min - config.span());
            let above = normalize(&config, config.max + config.span());
            assert_eq!(bands.classify(below), StatusColor::Red, "{key} below range");
            assert_eq!(bands.classify(above), StatusColor::Red, "{key} above range");
            assert_eq!(bands.classify(f64::INFINITY), StatusColor::Red);
            assert_eq!(bands.classify(f64::NEG_INFINITY), StatusColor::Red);
        }
    }

    #[test]
    fn hydraulic_pressure_end_to_end() {
        let config = default_config(SensorKey::HydraulicPressure);
        let bands = Bands::default();

        let nominal = normalize(&config, 200.0);
        assert!((nominal - 0.3548).abs() < 0.001);
        assert_eq!(bands.classify(nominal), StatusColor::Green);

        let low = normalize(&config, 160.0);
        assert!((low - 0.0968).abs() < 0.001);
        assert_eq!(bands.classify(low), StatusColor::Red);
    }

    #[test]
    fn single_red_requires_maintenance() {
        let statuses = [
            StatusColor::Red,
            StatusColor::Green,
            StatusColor::Green,
            StatusColor::Green,
            StatusColor::Green,
        ];
        assert_eq!(
            PredictionLabel::from_statuses(&statuses),
            PredictionLabel::MaintenanceRequired
        );
    }

    #[test]
    fn aggregation_is_total_over_all_combinations() {
        // Enumerate all 3^5 status vectors.
        for code in 0..3usize.pow(5) {
            let statuses: Vec<StatusColor> =
                (0..5).map(|i| ALL_COLORS[(code / 3usize.pow(i)) % 3]).collect();
            let expected = if statuses.contains(&StatusColor::Red) {
                PredictionLabel::MaintenanceRequired
            } else if statuses.contains(&StatusColor::Yellow) {
                PredictionLabel::MaintenanceRecommended
            } else {
                PredictionLabel::NormalOperation
            };
            assert_eq!(PredictionLabel::from_statuses(&statuses), expected);
        }
    }

    #[test]
    fn empty_status_set_is_normal() {
        assert_eq!(
            PredictionLabel::from_statuses(&[]),
            PredictionLabel::NormalOperation
        );
    }

    #[test]
    fn default_bands_are_valid() {
        assert!(Bands::default().validate().is_ok());
    }

    #[test]
    fn unordered_bands_are_rejected() {
        let bands = Bands {
            red_low: 0.4,
            yellow_low: 0.3,
            ..Bands::default()
        };
        assert!(matches!(bands.validate(), Err(TelemetryError::InvalidBands(_))));

        let bands = Bands {
            red_high: 1.2,
            ..Bands::default()
        };
        assert!(bands.validate().is_err());
    }

    #[test]
    fn prediction_messages() {
        assert_eq!(PredictionLabel::NormalOperation.to_string(), "Normal Operation");
        assert_eq!(
            PredictionLabel::MaintenanceRequired.severity(),
            StatusColor::Red
        );
    }
}
