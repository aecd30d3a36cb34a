//! Embedded baseline dataset.
//!
//! A small fixed sample collection, baked into the binary via
//! [`include_str!`], used whenever a live source is unavailable. It spans
//! both structure kinds and all four condition ratings so every dashboard
//! surface has something to show. The baseline flows through the same
//! shape/normalize/classify pipeline as live data.

use structure_map_source_models::{CanonicalFeature, SourceDataset};

use crate::classify::resolve_kind;
use crate::normalize::normalize_records;
use crate::shape::flatten;

/// Baseline bridge records, in the bridge inventory's native spellings.
const BRIDGES_BASELINE: &str = include_str!("../baseline/bridges.json");

/// Baseline culvert records, in the culvert inventory's native spellings.
const CULVERTS_BASELINE: &str = include_str!("../baseline/culverts.json");

/// Returns the baseline slice for one dataset variant.
///
/// The combined variant concatenates both slices and lets the classifier
/// resolve each feature's kind from its text signals.
///
/// # Panics
///
/// Panics if an embedded baseline file is malformed (a compile-time
/// guarantee, exercised by the tests below).
#[must_use]
pub fn baseline_features(dataset: SourceDataset) -> Vec<CanonicalFeature> {
    match dataset {
        SourceDataset::Bridges => parse_embedded(BRIDGES_BASELINE, dataset),
        SourceDataset::Culverts => parse_embedded(CULVERTS_BASELINE, dataset),
        SourceDataset::Combined => {
            let mut features = parse_embedded(BRIDGES_BASELINE, dataset);
            features.extend(parse_embedded(CULVERTS_BASELINE, dataset));
            features
        }
    }
}

fn parse_embedded(raw: &str, dataset: SourceDataset) -> Vec<CanonicalFeature> {
    let payload: serde_json::Value =
        serde_json::from_str(raw).unwrap_or_else(|e| panic!("malformed embedded baseline: {e}"));
    let flattened =
        flatten(&payload).unwrap_or_else(|e| panic!("embedded baseline has a bad shape: {e}"));
    let mut batch = normalize_records(dataset, &flattened);
    for feature in &mut batch.features {
        resolve_kind(feature);
    }
    batch.features
}
