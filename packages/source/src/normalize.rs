//! Field mapping from source-specific property names onto the canonical
//! attribute set.
//!
//! Each canonical attribute has a per-dataset **ordered candidate list**:
//! the first candidate that yields a usable value wins. The bridge and
//! culvert inventory variants spell the same dimension differently (a
//! culvert record's span lives in `CULVERTLEN`, a bridge record's in
//! `MAX_CLEAR_`), so the lists are symmetric mirrors of each other rather
//! than source-specific branches. Canonical camelCase spellings sit at the
//! front of every list so exported documents re-import losslessly.

use serde_json::{Map, Value};
use structure_map_source_models::{CanonicalFeature, SourceDataset, normalize_district};
use structure_map_structure_models::{ConditionRating, StructureKind};

use crate::shape::{FlattenedPayload, RawRecord};

/// Ordered property-name candidates for every canonical attribute.
#[derive(Debug)]
pub struct FieldCandidates {
    /// Longitude candidates, primary spelling first.
    pub longitude: &'static [&'static str],
    /// Latitude candidates, primary spelling first.
    pub latitude: &'static [&'static str],
    /// District name candidates.
    pub district: &'static [&'static str],
    /// Structure identifier candidates.
    pub structure_id: &'static [&'static str],
    /// Road name candidates.
    pub road_name: &'static [&'static str],
    /// Construction-type text candidates.
    pub construction: &'static [&'static str],
    /// Passage-type text candidates.
    pub passage: &'static [&'static str],
    /// Total length candidates.
    pub length: &'static [&'static str],
    /// Total width candidates.
    pub width: &'static [&'static str],
    /// Maximum clear span candidates.
    pub span: &'static [&'static str],
    /// Condition rating candidates.
    pub rating: &'static [&'static str],
    /// Explicit structure-kind candidates (pre-classified exports).
    pub kind: &'static [&'static str],
}

/// Candidate ordering for the dedicated bridge inventory.
const BRIDGE_FIELDS: FieldCandidates = FieldCandidates {
    longitude: &["longitude", "LONGITUDE_", "LONGITUDE"],
    latitude: &["latitude", "LATITUDE_N", "LATITUDE"],
    district: &["districtName", "DISTRICT"],
    structure_id: &["structureId", "BRIDGEID", "CULVERET_I"],
    road_name: &["roadName", "ROADNAME"],
    construction: &["constructionType", "MAIN_CONST", "MAINCONSTR"],
    passage: &["passageType", "PASSAGE_TY", "PASSAGETYP"],
    length: &["totalLength", "TOTAL_LENG"],
    width: &["totalWidth", "TOTAL_WIDT"],
    span: &["maxClearSpan", "MAX_CLEAR_"],
    rating: &["conditionRating", "Rating", "rating"],
    kind: &["structureKind", "dataType"],
};

/// Candidate ordering for the dedicated culvert inventory — the mirror of
/// [`BRIDGE_FIELDS`]: culvert-sourced spellings outrank the bridge ones.
const CULVERT_FIELDS: FieldCandidates = FieldCandidates {
    longitude: &["longitude", "LONGITUDE", "LONGITUDE_"],
    latitude: &["latitude", "LATITUDE", "LATITUDE_N"],
    district: &["districtName", "DISTRICT"],
    structure_id: &["structureId", "CULVERET_I", "BRIDGEID"],
    road_name: &["roadName", "ROADNAME"],
    construction: &["constructionType", "MAINCONSTR", "MAIN_CONST"],
    passage: &["passageType", "PASSAGETYP", "PASSAGE_TY"],
    length: &["totalLength", "MAX_CLEAR_", "TOTAL_LENG"],
    width: &["totalWidth", "CLEARROADW", "TOTAL_WIDT"],
    span: &["maxClearSpan", "CULVERTLEN", "MAX_CLEAR_"],
    rating: &["conditionRating", "Rating", "rating"],
    kind: &["structureKind", "dataType"],
};

/// Candidate ordering for a combined inventory, which mixes both variants'
/// spellings in one file.
const COMBINED_FIELDS: FieldCandidates = FieldCandidates {
    longitude: &["longitude", "LONGITUDE_", "LONGITUDE"],
    latitude: &["latitude", "LATITUDE_N", "LATITUDE"],
    district: &["districtName", "DISTRICT"],
    structure_id: &["structureId", "BRIDGEID", "CULVERET_I"],
    road_name: &["roadName", "ROADNAME"],
    construction: &["constructionType", "MAIN_CONST", "MAINCONSTR"],
    passage: &["passageType", "PASSAGE_TY", "PASSAGETYP"],
    length: &["totalLength", "TOTAL_LENG", "MAX_CLEAR_"],
    width: &["totalWidth", "TOTAL_WIDT", "CLEARROADW"],
    span: &["maxClearSpan", "MAX_CLEAR_", "CULVERTLEN"],
    rating: &["conditionRating", "Rating", "rating"],
    kind: &["structureKind", "dataType"],
};

/// Returns the candidate table for a dataset variant.
#[must_use]
pub const fn candidates_for(dataset: SourceDataset) -> &'static FieldCandidates {
    match dataset {
        SourceDataset::Bridges => &BRIDGE_FIELDS,
        SourceDataset::Culverts => &CULVERT_FIELDS,
        SourceDataset::Combined => &COMBINED_FIELDS,
    }
}

/// A batch of normalized features plus the count of records that could not
/// be lifted into features at all.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    /// Canonical features in source order.
    pub features: Vec<CanonicalFeature>,
    /// Count of malformed entries skipped during shape flattening.
    pub skipped: usize,
}

/// Normalizes flattened records into canonical features.
///
/// Every field access has a defined default, so this never fails: missing
/// strings become empty, missing dimensions become `None`, unresolvable
/// coordinates become `0.0`.
#[must_use]
pub fn normalize_records(dataset: SourceDataset, payload: &FlattenedPayload) -> NormalizedBatch {
    let fields = candidates_for(dataset);
    let mut features = Vec::with_capacity(payload.records.len());

    for record in &payload.records {
        features.push(normalize_record(dataset, fields, record));
    }

    NormalizedBatch {
        features,
        skipped: payload.skipped,
    }
}

fn normalize_record(
    dataset: SourceDataset,
    fields: &FieldCandidates,
    record: &RawRecord,
) -> CanonicalFeature {
    let props = &record.properties;

    // Explicit geometry wins; otherwise synthesize a point from the
    // coordinate candidates, defaulting each axis to 0.0.
    let (longitude, latitude) = record.coordinates.unwrap_or_else(|| {
        (
            first_f64(props, fields.longitude).unwrap_or(0.0),
            first_f64(props, fields.latitude).unwrap_or(0.0),
        )
    });

    let district_name = first_str(props, fields.district)
        .and_then(normalize_district)
        .unwrap_or_default();

    let condition_rating = first_str(props, fields.rating)
        .map_or(ConditionRating::Unknown, ConditionRating::from_raw);

    // A source that already distinguishes bridge/culvert sets the kind
    // here; combined sources leave Unknown for the classifier.
    let structure_kind = first_str(props, fields.kind)
        .and_then(parse_kind)
        .or_else(|| dataset.assumed_kind())
        .unwrap_or(StructureKind::Unknown);

    CanonicalFeature {
        longitude,
        latitude,
        district_name,
        structure_id: first_id(props, fields.structure_id).unwrap_or_default(),
        road_name: first_str(props, fields.road_name)
            .unwrap_or_default()
            .to_string(),
        construction_type: first_str(props, fields.construction)
            .unwrap_or_default()
            .to_string(),
        passage_type: first_str(props, fields.passage)
            .unwrap_or_default()
            .to_string(),
        total_length: first_f64(props, fields.length),
        total_width: first_f64(props, fields.width),
        max_clear_span: first_f64(props, fields.span),
        condition_rating,
        structure_kind,
        source_dataset: dataset,
    }
}

/// Maps an explicit kind string (from a pre-classified export's
/// `structureKind` or the legacy `dataType` tag) onto the taxonomy.
fn parse_kind(raw: &str) -> Option<StructureKind> {
    match raw.trim().to_uppercase().as_str() {
        "BRIDGE" => Some(StructureKind::Bridge),
        "CULVERT" => Some(StructureKind::Culvert),
        "OTHER" => Some(StructureKind::Other),
        _ => None,
    }
}

/// First candidate that holds a non-empty string value.
fn first_str<'a>(props: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|field| props.get(*field)?.as_str())
        .find(|s| !s.trim().is_empty())
}

/// First candidate that holds a finite numeric value — either a JSON
/// number or a numeric string. Non-finite values never win.
fn first_f64(props: &Map<String, Value>, candidates: &[&str]) -> Option<f64> {
    candidates
        .iter()
        .filter_map(|field| value_as_f64(props.get(*field)?))
        .next()
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// First candidate that holds a non-empty identifier. Numeric IDs (some
/// inventories use integer object IDs) are converted to strings.
fn first_id(props: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    for field in candidates {
        let Some(value) = props.get(*field) else {
            continue;
        };
        if let Some(s) = value.as_str()
            && !s.trim().is_empty()
        {
            return Some(s.to_string());
        }
        if let Some(n) = value.as_i64() {
            return Some(n.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::flatten;
    use serde_json::json;

    fn normalize_one(dataset: SourceDataset, record: Value) -> CanonicalFeature {
        let payload = flatten(&json!([record])).unwrap();
        normalize_records(dataset, &payload).features.remove(0)
    }

    #[test]
    fn bridge_record_maps_primary_spellings() {
        let feature = normalize_one(
            SourceDataset::Bridges,
            json!({
                "BRIDGEID": "10B",
                "ROADNAME": "LADIUN-CHACH",
                "DISTRICT": "SUJAWAL",
                "MAIN_CONST": "CONT. RC SLAB BRIDGE",
                "LONGITUDE_": 68.109_304,
                "LATITUDE_N": 24.290_852,
                "TOTAL_LENG": 7.3,
                "TOTAL_WIDT": 5.7,
                "MAX_CLEAR_": 2.7,
                "Rating": "EXCELLENT"
            }),
        );
        assert_eq!(feature.structure_id, "10B");
        assert_eq!(feature.district_name, "SUJAWAL");
        assert!((feature.longitude - 68.109_304).abs() < f64::EPSILON);
        assert_eq!(feature.total_length, Some(7.3));
        assert_eq!(feature.max_clear_span, Some(2.7));
        assert_eq!(feature.condition_rating, ConditionRating::Excellent);
        assert_eq!(feature.structure_kind, StructureKind::Bridge);
    }

    #[test]
    fn culvert_spellings_outrank_bridge_spellings_for_culvert_records() {
        // A culvert record carrying both variants' fields: the culvert
        // spelling must win for every dimension.
        let feature = normalize_one(
            SourceDataset::Culverts,
            json!({
                "CULVERET_I": "30C",
                "MAINCONSTR": "BOX CULVERT",
                "MAX_CLEAR_": 15.0,
                "TOTAL_LENG": 99.0,
                "CLEARROADW": 8.5,
                "TOTAL_WIDT": 99.0,
                "CULVERTLEN": 4.2,
                "Rating": "GOOD"
            }),
        );
        assert_eq!(feature.structure_id, "30C");
        assert_eq!(feature.construction_type, "BOX CULVERT");
        assert_eq!(feature.total_length, Some(15.0));
        assert_eq!(feature.total_width, Some(8.5));
        assert_eq!(feature.max_clear_span, Some(4.2));
        assert_eq!(feature.structure_kind, StructureKind::Culvert);
    }

    #[test]
    fn secondary_spelling_used_when_primary_missing() {
        let feature = normalize_one(
            SourceDataset::Culverts,
            json!({"CULVERET_I": "31C", "TOTAL_LENG": 12.0, "TOTAL_WIDT": 6.0}),
        );
        assert_eq!(feature.total_length, Some(12.0));
        assert_eq!(feature.total_width, Some(6.0));
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let feature = normalize_one(
            SourceDataset::Bridges,
            json!({"LONGITUDE_": "68.10", "LATITUDE_N": "24.29", "TOTAL_LENG": "7.3"}),
        );
        assert!((feature.longitude - 68.10).abs() < f64::EPSILON);
        assert_eq!(feature.total_length, Some(7.3));
    }

    #[test]
    fn non_numeric_candidate_falls_through() {
        let feature = normalize_one(
            SourceDataset::Culverts,
            json!({"MAX_CLEAR_": "n/a", "TOTAL_LENG": 12.5}),
        );
        assert_eq!(feature.total_length, Some(12.5));
    }

    #[test]
    fn missing_coordinates_default_to_zero() {
        let feature = normalize_one(SourceDataset::Bridges, json!({"BRIDGEID": "40B"}));
        assert!((feature.longitude - 0.0).abs() < f64::EPSILON);
        assert!((feature.latitude - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_dimensions_are_none_not_zero() {
        let feature = normalize_one(SourceDataset::Bridges, json!({"BRIDGEID": "40B"}));
        assert_eq!(feature.total_length, None);
        assert_eq!(feature.total_width, None);
        assert_eq!(feature.max_clear_span, None);
    }

    #[test]
    fn sentinel_district_treated_as_absent() {
        let feature = normalize_one(
            SourceDataset::Bridges,
            json!({"BRIDGEID": "40B", "DISTRICT": "undefined"}),
        );
        assert_eq!(feature.district(), None);
    }

    #[test]
    fn explicit_geometry_wins_over_coordinate_fields() {
        let payload = flatten(&json!([{
            "geometry": {"type": "Point", "coordinates": [67.0, 24.8]},
            "properties": {"LONGITUDE_": 99.0, "LATITUDE_N": 99.0, "BRIDGEID": "10B"}
        }]))
        .unwrap();
        let feature = normalize_records(SourceDataset::Bridges, &payload)
            .features
            .remove(0);
        assert!((feature.longitude - 67.0).abs() < f64::EPSILON);
        assert!((feature.latitude - 24.8).abs() < f64::EPSILON);
    }

    #[test]
    fn combined_dataset_leaves_kind_unknown() {
        let feature = normalize_one(
            SourceDataset::Combined,
            json!({"BRIDGEID": "10B", "MAIN_CONST": "RC SLAB"}),
        );
        assert_eq!(feature.structure_kind, StructureKind::Unknown);
    }

    #[test]
    fn legacy_data_type_tag_sets_kind() {
        let feature = normalize_one(
            SourceDataset::Combined,
            json!({"BRIDGEID": "10B", "dataType": "bridge"}),
        );
        assert_eq!(feature.structure_kind, StructureKind::Bridge);
    }

    #[test]
    fn numeric_id_converted_to_string() {
        let feature = normalize_one(SourceDataset::Bridges, json!({"BRIDGEID": 42}));
        assert_eq!(feature.structure_id, "42");
    }

    #[test]
    fn rating_falls_back_to_lowercase_spelling() {
        let feature = normalize_one(
            SourceDataset::Bridges,
            json!({"BRIDGEID": "10B", "rating": "fair"}),
        );
        assert_eq!(feature.condition_rating, ConditionRating::Fair);
    }
}
