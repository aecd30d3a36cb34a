//! Top-level payload shape detection.
//!
//! Inventory exports arrive in three recognized shapes: a bare array of
//! records, a single `FeatureCollection`, or a single `Feature`. Anything
//! else is a reportable [`SourceError::UnrecognizedShape`], not a silent
//! failure.

use serde_json::{Map, Value};

use crate::SourceError;

/// A single record lifted out of a source payload, before field mapping.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// `[longitude, latitude]` from an explicit geometry, when present.
    pub coordinates: Option<(f64, f64)>,
    /// The record's flat property map.
    pub properties: Map<String, Value>,
}

/// The result of flattening a payload: the usable records plus the number
/// of malformed (non-object) entries that were skipped.
#[derive(Debug, Clone)]
pub struct FlattenedPayload {
    /// Records ready for normalization, in source order.
    pub records: Vec<RawRecord>,
    /// Count of entries dropped because they were not JSON objects.
    pub skipped: usize,
}

/// Flattens a raw JSON payload into individual records.
///
/// # Errors
///
/// Returns [`SourceError::UnrecognizedShape`] when the top level is neither
/// a bare array, a `FeatureCollection`, nor a single `Feature`.
pub fn flatten(payload: &Value) -> Result<FlattenedPayload, SourceError> {
    match payload {
        Value::Array(items) => Ok(collect_records(items)),
        Value::Object(obj) => {
            if obj.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
                let features = obj
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| SourceError::UnrecognizedShape {
                        message: "FeatureCollection without a features array".to_string(),
                    })?;
                return Ok(collect_records(features));
            }
            // A single Feature, or a bare record object carrying geometry.
            if obj.get("type").and_then(Value::as_str) == Some("Feature")
                || obj.contains_key("geometry")
            {
                let mut out = FlattenedPayload {
                    records: Vec::with_capacity(1),
                    skipped: 0,
                };
                if let Some(record) = record_from_value(payload) {
                    out.records.push(record);
                } else {
                    out.skipped = 1;
                }
                return Ok(out);
            }
            Err(SourceError::UnrecognizedShape {
                message: format!(
                    "object with keys [{}] is not a FeatureCollection or Feature",
                    obj.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            })
        }
        other => Err(SourceError::UnrecognizedShape {
            message: format!("expected array or object, got {other}"),
        }),
    }
}

fn collect_records(items: &[Value]) -> FlattenedPayload {
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        match record_from_value(item) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    FlattenedPayload { records, skipped }
}

/// Lifts one JSON value into a [`RawRecord`].
///
/// Feature-shaped objects contribute their `properties` map and explicit
/// geometry coordinates; plain objects contribute themselves. Non-objects
/// yield `None`.
fn record_from_value(value: &Value) -> Option<RawRecord> {
    let obj = value.as_object()?;

    let coordinates = obj.get("geometry").and_then(point_coordinates);

    // A Feature's attributes live under "properties"; a bare record is its
    // own property map.
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(obj)
        .clone();

    Some(RawRecord {
        coordinates,
        properties,
    })
}

/// Extracts `(longitude, latitude)` from a GeoJSON Point geometry. Rejects
/// non-finite coordinates so downstream math never sees NaN.
fn point_coordinates(geometry: &Value) -> Option<(f64, f64)> {
    let coords = geometry.get("coordinates")?.as_array()?;
    let lng = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    if lng.is_finite() && lat.is_finite() {
        Some((lng, lat))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_bare_array() {
        let payload = json!([
            {"BRIDGEID": "10B", "DISTRICT": "SUJAWAL"},
            {"BRIDGEID": "20B", "DISTRICT": "MULTAN"}
        ]);
        let out = flatten(&payload).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.skipped, 0);
        assert!(out.records[0].coordinates.is_none());
    }

    #[test]
    fn flattens_feature_collection() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [68.1, 24.2]},
                "properties": {"BRIDGEID": "10B"}
            }]
        });
        let out = flatten(&payload).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].coordinates, Some((68.1, 24.2)));
        assert_eq!(out.records[0].properties["BRIDGEID"], "10B");
    }

    #[test]
    fn flattens_single_feature() {
        let payload = json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [67.0, 24.8]},
            "properties": {"CULVERET_I": "30C"}
        });
        let out = flatten(&payload).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].coordinates, Some((67.0, 24.8)));
    }

    #[test]
    fn bare_record_uses_itself_as_properties() {
        let payload = json!([{"geometry": {"type": "Point", "coordinates": [68.1, 24.2]},
            "BRIDGEID": "10B"}]);
        let out = flatten(&payload).unwrap();
        assert_eq!(out.records[0].coordinates, Some((68.1, 24.2)));
        assert_eq!(out.records[0].properties["BRIDGEID"], "10B");
    }

    #[test]
    fn rejects_unrecognized_object() {
        let payload = json!({"rows": []});
        let err = flatten(&payload).unwrap_err();
        assert!(matches!(err, SourceError::UnrecognizedShape { .. }));
    }

    #[test]
    fn rejects_scalar_payload() {
        let err = flatten(&json!(42)).unwrap_err();
        assert!(matches!(err, SourceError::UnrecognizedShape { .. }));
    }

    #[test]
    fn skips_non_object_entries() {
        let payload = json!([{"BRIDGEID": "10B"}, "garbage", null]);
        let out = flatten(&payload).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 2);
    }

    #[test]
    fn drops_non_finite_geometry() {
        let payload = json!([{
            "geometry": {"type": "Point", "coordinates": [null, 24.2]},
            "BRIDGEID": "10B"
        }]);
        let out = flatten(&payload).unwrap();
        assert!(out.records[0].coordinates.is_none());
    }
}
