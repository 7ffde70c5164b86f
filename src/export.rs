//! JSON export of the current dashboard state.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::data::{HistoryBuffer, SensorTable, Snapshot};

/// Build the export document for a snapshot and its history.
///
/// Layout: `summary` (prediction and status counts), `sensors` (one entry
/// per sensor with range and classification), `snapshot` (raw) and
/// `history` (per-sensor points keyed by wire name).
pub fn build_export(
    snapshot: &Snapshot,
    history: &HistoryBuffer,
    sensors: &SensorTable,
) -> Result<serde_json::Value> {
    let counts = snapshot.status_counts();

    let mut summary = serde_json::Map::new();
    summary.insert("prediction".to_string(), serde_json::json!(snapshot.prediction.message()));
    summary.insert("sequence".to_string(), serde_json::json!(snapshot.sequence));
    summary.insert("taken_at".to_string(), serde_json::json!(snapshot.taken_at.to_rfc3339()));
    summary.insert("green".to_string(), serde_json::json!(counts.green));
    summary.insert("yellow".to_string(), serde_json::json!(counts.yellow));
    summary.insert("red".to_string(), serde_json::json!(counts.red));

    let sensor_rows: Vec<serde_json::Value> = sensors
        .iter()
        .map(|(key, config)| {
            serde_json::json!({
                "key": key.wire_name(),
                "label": config.label,
                "unit": config.unit,
                "min": config.min,
                "max": config.max,
                "value": snapshot.value(key),
                "normalized": snapshot.normalized[key],
                "status": snapshot.status_of(key),
                "history_points": history.get(key).len(),
            })
        })
        .collect();

    let mut export = serde_json::Map::new();
    export.insert("summary".to_string(), serde_json::Value::Object(summary));
    export.insert("sensors".to_string(), serde_json::Value::Array(sensor_rows));
    export.insert("snapshot".to_string(), serde_json::to_value(snapshot)?);
    export.insert("history".to_string(), serde_json::to_value(history.to_map())?);

    Ok(serde_json::Value::Object(export))
}

/// Write an export document as pretty-printed JSON.
pub fn write_export(path: &Path, export: &serde_json::Value) -> Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
