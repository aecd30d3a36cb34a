//! Export document assembly.
//!
//! The export surface is a JSON document with kind-partitioned GeoJSON
//! FeatureCollections plus counts and a timestamp. Properties are written
//! under the canonical camelCase names, which sit first in the loader's
//! candidate tables, so an exported document fed back through the loader
//! reproduces the same features.

use chrono::Utc;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use structure_map_source_models::CanonicalFeature;
use structure_map_structure_models::StructureKind;

/// Counts and provenance stamped onto every export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub total_bridges: usize,
    pub total_culverts: usize,
    /// UTC export time, RFC 3339.
    pub exported_at: String,
}

/// The complete export document.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub bridges: FeatureCollection,
    pub culverts: FeatureCollection,
    pub metadata: ExportMetadata,
}

impl ExportDocument {
    /// Partitions a feature slice by kind and assembles the document.
    ///
    /// The legacy document format carries exactly two lists, so non-culvert
    /// kinds land in the bridges partition; the `structureKind` property
    /// preserves the real kind either way.
    #[must_use]
    pub fn build(features: &[CanonicalFeature]) -> Self {
        let mut bridges = Vec::new();
        let mut culverts = Vec::new();
        for feature in features {
            if feature.structure_kind == StructureKind::Culvert {
                culverts.push(to_geojson(feature));
            } else {
                bridges.push(to_geojson(feature));
            }
        }

        let metadata = ExportMetadata {
            total_bridges: bridges.len(),
            total_culverts: culverts.len(),
            exported_at: Utc::now().to_rfc3339(),
        };

        Self {
            bridges: collection(bridges),
            culverts: collection(culverts),
            metadata,
        }
    }
}

const fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Renders one canonical feature as a GeoJSON point feature.
///
/// # Panics
///
/// Never panics in practice: serializing [`CanonicalFeature`] always yields
/// a JSON object.
#[must_use]
pub fn to_geojson(feature: &CanonicalFeature) -> Feature {
    let mut properties: JsonObject = match serde_json::to_value(feature) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => unreachable!("canonical features serialize as objects"),
    };
    // Coordinates live in the geometry; absent dimensions are dropped
    // rather than written as null.
    properties.remove("longitude");
    properties.remove("latitude");
    properties.retain(|_, v| !v.is_null());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![
            feature.longitude,
            feature.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structure_map_source::loader::parse_payload;
    use structure_map_source_models::SourceDataset;
    use structure_map_structure_models::ConditionRating;

    fn fixtures() -> Vec<CanonicalFeature> {
        vec![
            CanonicalFeature {
                longitude: 68.109_304,
                latitude: 24.290_852,
                district_name: "SUJAWAL".to_string(),
                structure_id: "10B".to_string(),
                road_name: "LADIUN-CHACH".to_string(),
                construction_type: "CONT. RC SLAB BRIDGE".to_string(),
                passage_type: String::new(),
                total_length: Some(7.3),
                total_width: Some(5.7),
                max_clear_span: Some(2.7),
                condition_rating: ConditionRating::Excellent,
                structure_kind: StructureKind::Bridge,
                source_dataset: SourceDataset::Bridges,
            },
            CanonicalFeature {
                longitude: 67.0,
                latitude: 24.8,
                district_name: "KARACHI".to_string(),
                structure_id: "30C".to_string(),
                road_name: String::new(),
                construction_type: "BOX CULVERT".to_string(),
                passage_type: "IRRIGATION CHANNEL".to_string(),
                total_length: Some(15.0),
                total_width: Some(8.5),
                max_clear_span: Some(4.2),
                condition_rating: ConditionRating::Good,
                structure_kind: StructureKind::Culvert,
                source_dataset: SourceDataset::Culverts,
            },
        ]
    }

    #[test]
    fn document_partitions_by_kind_and_counts() {
        let document = ExportDocument::build(&fixtures());
        assert_eq!(document.bridges.features.len(), 1);
        assert_eq!(document.culverts.features.len(), 1);
        assert_eq!(document.metadata.total_bridges, 1);
        assert_eq!(document.metadata.total_culverts, 1);
    }

    #[test]
    fn properties_use_canonical_names_without_nulls() {
        let features = fixtures();
        let document = ExportDocument::build(&features);
        let props = document.bridges.features[0].properties.as_ref().unwrap();
        assert_eq!(props["structureId"], "10B");
        assert_eq!(props["districtName"], "SUJAWAL");
        assert_eq!(props["conditionRating"], "EXCELLENT");
        assert!(!props.contains_key("longitude"));

        let sparse = CanonicalFeature {
            total_length: None,
            ..features[0].clone()
        };
        let rendered = to_geojson(&sparse);
        assert!(
            !rendered
                .properties
                .as_ref()
                .unwrap()
                .contains_key("totalLength")
        );
    }

    #[test]
    fn export_round_trips_through_the_loader() {
        let originals = fixtures();
        let document = ExportDocument::build(&originals);

        let payload = serde_json::to_value(&document.culverts).unwrap();
        let batch = parse_payload(SourceDataset::Culverts, &payload).unwrap();

        assert_eq!(batch.features.len(), 1);
        let reimported = &batch.features[0];
        assert_eq!(reimported.structure_id, "30C");
        assert_eq!(reimported.district_name, "KARACHI");
        assert_eq!(reimported.total_length, Some(15.0));
        assert_eq!(reimported.total_width, Some(8.5));
        assert_eq!(reimported.max_clear_span, Some(4.2));
        assert_eq!(reimported.condition_rating, ConditionRating::Good);
        assert_eq!(reimported.structure_kind, StructureKind::Culvert);
        assert!((reimported.longitude - 67.0).abs() < f64::EPSILON);
    }
}
