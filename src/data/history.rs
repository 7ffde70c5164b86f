//! Bounded per-sensor history for charts and sparklines.

use std::collections::VecDeque;

use serde::Serialize;

use super::sensor::{SensorKey, SensorMap};

/// Default number of points kept per sensor.
pub const DEFAULT_CAPACITY: usize = 30;

/// Default minimum change between consecutive stored points.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// A single charted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    /// Wall-clock label, formatted for display (`HH:MM:SS`).
    pub timestamp: String,
    pub value: f64,
}

impl HistoryPoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// Sliding window of recent values for every sensor.
///
/// A point is only stored when it moved more than `epsilon` away from the
/// last stored value, so a flat signal does not crowd the window with
/// identical points. Once a sensor holds `capacity` points the oldest one is
/// evicted.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    series: SensorMap<VecDeque<HistoryPoint>>,
    capacity: usize,
    epsilon: f64,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    /// Create an empty buffer with the default capacity and epsilon.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, DEFAULT_EPSILON)
    }

    /// Create an empty buffer with explicit limits.
    ///
    /// A capacity of zero is raised to one so the latest value is always kept.
    pub fn with_limits(capacity: usize, epsilon: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            series: SensorMap::from_fn(|_| VecDeque::with_capacity(capacity)),
            capacity,
            epsilon,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a point if it differs enough from the last stored one.
    ///
    /// Returns `true` if the point was stored.
    pub fn append(&mut self, key: SensorKey, point: HistoryPoint) -> bool {
        let series = &mut self.series[key];
        let changed = series
            .back()
            .map_or(true, |last| (last.value - point.value).abs() > self.epsilon);
        if !changed {
            return false;
        }

        series.push_back(point);
        while series.len() > self.capacity {
            series.pop_front();
        }
        true
    }

    /// Ordered points for one sensor, oldest first.
    pub fn get(&self, key: SensorKey) -> &VecDeque<HistoryPoint> {
        &self.series[key]
    }

    /// Most recent stored value for a sensor.
    pub fn latest(&self, key: SensorKey) -> Option<f64> {
        self.series[key].back().map(|p| p.value)
    }

    /// Points as `(index, value)` pairs, ready for a chart dataset.
    pub fn chart_points(&self, key: SensorKey) -> Vec<(f64, f64)> {
        self.series[key]
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect()
    }

    /// Sparkline levels (0-7) for the last `width` points of a sensor.
    ///
    /// Levels are scaled between `floor` and `ceil`, typically the sensor's
    /// configured range. Returns an empty Vec until two points exist.
    pub fn sparkline(&self, key: SensorKey, floor: f64, ceil: f64, width: usize) -> Vec<u8> {
        let series = &self.series[key];
        if series.len() < 2 {
            return Vec::new();
        }

        let range = (ceil - floor).max(f64::EPSILON);
        series
            .iter()
            .skip(series.len().saturating_sub(width))
            .map(|p| {
                let level = ((p.value - floor) / range * 7.0).round();
                level.clamp(0.0, 7.0) as u8
            })
            .collect()
    }

    /// Serializable copy keyed by sensor wire name.
    pub fn to_map(&self) -> SensorMap<Vec<HistoryPoint>> {
        self.series.map(|_, points| points.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64) -> HistoryPoint {
        HistoryPoint::new("12:00:00", value)
    }

    #[test]
    fn new_buffer_is_empty_for_every_sensor() {
        let h = HistoryBuffer::new();
        for key in SensorKey::ALL {
            assert!(h.get(key).is_empty());
            assert!(h.latest(key).is_none());
        }
    }

    #[test]
    fn first_point_is_always_accepted() {
        let mut h = HistoryBuffer::new();
        assert!(h.append(SensorKey::SawBladeRpm, point(1500.0)));
        assert_eq!(h.get(SensorKey::SawBladeRpm).len(), 1);
    }

    #[test]
    fn caps_at_capacity_keeping_latest_in_order() {
        let mut h = HistoryBuffer::new();
        for i in 0..35 {
            h.append(SensorKey::HydraulicPressure, point(i as f64));
        }

        let values: Vec<f64> =
            h.get(SensorKey::HydraulicPressure).iter().map(|p| p.value).collect();
        let expected: Vec<f64> = (5..35).map(|i| i as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn near_identical_values_are_dropped() {
        let mut h = HistoryBuffer::new();
        let mut value = 50.0;
        for _ in 0..20 {
            h.append(SensorKey::HydraulicOilTemperature, point(value));
            value += 0.05;
        }
        // Comparison is against the last stored point, not the last offered one.
        assert!(h.get(SensorKey::HydraulicOilTemperature).len() < 20);
    }

    #[test]
    fn values_within_epsilon_of_anchor_yield_single_point() {
        let mut h = HistoryBuffer::new();
        for value in [70.0, 70.05, 69.95, 70.1, 69.9, 70.0] {
            h.append(SensorKey::BladeSharpnessLevel, point(value));
        }
        assert_eq!(h.get(SensorKey::BladeSharpnessLevel).len(), 1);
    }

    #[test]
    fn exactly_epsilon_is_not_a_change() {
        let mut h = HistoryBuffer::with_limits(30, 0.5);
        h.append(SensorKey::FuelConsumption, point(15.0));
        assert!(!h.append(SensorKey::FuelConsumption, point(15.5)));
        assert!(h.append(SensorKey::FuelConsumption, point(15.75)));
    }

    #[test]
    fn sensors_are_tracked_independently() {
        let mut h = HistoryBuffer::new();
        h.append(SensorKey::HydraulicPressure, point(200.0));
        h.append(SensorKey::HydraulicPressure, point(210.0));
        h.append(SensorKey::FuelConsumption, point(15.0));

        assert_eq!(h.get(SensorKey::HydraulicPressure).len(), 2);
        assert_eq!(h.get(SensorKey::FuelConsumption).len(), 1);
        assert!(h.get(SensorKey::SawBladeRpm).is_empty());
    }

    #[test]
    fn zero_capacity_keeps_latest_point() {
        let mut h = HistoryBuffer::with_limits(0, 0.1);
        h.append(SensorKey::SawBladeRpm, point(1.0));
        h.append(SensorKey::SawBladeRpm, point(2.0));
        assert_eq!(h.latest(SensorKey::SawBladeRpm), Some(2.0));
        assert_eq!(h.get(SensorKey::SawBladeRpm).len(), 1);
    }

    #[test]
    fn sparkline_empty_with_single_point() {
        let mut h = HistoryBuffer::new();
        h.append(SensorKey::HydraulicPressure, point(200.0));
        assert!(h.sparkline(SensorKey::HydraulicPressure, 145.0, 300.0, 8).is_empty());
    }

    #[test]
    fn sparkline_scales_into_range() {
        let mut h = HistoryBuffer::new();
        for value in [0.0, 50.0, 100.0, 150.0] {
            h.append(SensorKey::HydraulicPressure, point(value));
        }
        let levels = h.sparkline(SensorKey::HydraulicPressure, 0.0, 100.0, 8);
        assert_eq!(levels, vec![0, 4, 7, 7]);

        let tail = h.sparkline(SensorKey::HydraulicPressure, 0.0, 100.0, 2);
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn chart_points_are_indexed() {
        let mut h = HistoryBuffer::new();
        h.append(SensorKey::SawBladeRpm, point(1000.0));
        h.append(SensorKey::SawBladeRpm, point(1100.0));
        assert_eq!(
            h.chart_points(SensorKey::SawBladeRpm),
            vec![(0.0, 1000.0), (1.0, 1100.0)]
        );
    }
}
