//! Structure kind classification heuristics.
//!
//! When a combined inventory does not distinguish bridges from culverts,
//! the kind is inferred from three text signals — construction type,
//! passage type, and the structure identifier — using keyword detection,
//! with a dimension-based tiebreak when no keyword matches. The
//! vocabularies are data, not code, so the heuristic is unit-testable
//! independent of I/O. It is approximate by nature: keyword matching on
//! free text is a convenience, not ground truth.

use structure_map_source_models::CanonicalFeature;
use structure_map_structure_models::StructureKind;

/// Construction-type keywords indicating a bridge.
const BRIDGE_CONSTRUCTION: &[&str] = &["bridge", "slab", "truss", "girder"];

/// Passage-type keywords indicating a bridge.
const BRIDGE_PASSAGE: &[&str] = &["bridge"];

/// Construction-type keywords indicating a culvert.
const CULVERT_CONSTRUCTION: &[&str] = &["culvert", "box", "pipe", "arch"];

/// Passage-type keywords indicating a culvert.
const CULVERT_PASSAGE: &[&str] = &["culvert", "irrigation", "drain", "channel"];

/// Dimension tiebreak thresholds: anything shorter than 20 m and narrower
/// than 10 m is presumed a culvert.
const CULVERT_MAX_LENGTH: f64 = 20.0;
const CULVERT_MAX_WIDTH: f64 = 10.0;

/// Infers the structure kind from text signals and dimensions.
///
/// Bridge signals are tested across all three text fields first, then
/// culvert signals, then the dimension fallback. The fallback is total:
/// for any finite dimensions (missing treated as `0.0`) exactly one of
/// [`StructureKind::Bridge`] or [`StructureKind::Culvert`] comes back —
/// never `Other` or `Unknown`.
#[must_use]
pub fn classify_kind(
    construction_type: &str,
    passage_type: &str,
    structure_id: &str,
    total_length: Option<f64>,
    total_width: Option<f64>,
) -> StructureKind {
    let construction = construction_type.to_lowercase();
    let passage = passage_type.to_lowercase();
    let id = structure_id.to_lowercase();

    if contains_any(&construction, BRIDGE_CONSTRUCTION)
        || contains_any(&passage, BRIDGE_PASSAGE)
        || id.contains('b')
    {
        return StructureKind::Bridge;
    }

    if contains_any(&construction, CULVERT_CONSTRUCTION)
        || contains_any(&passage, CULVERT_PASSAGE)
        || id.contains('c')
    {
        return StructureKind::Culvert;
    }

    let length = total_length.unwrap_or(0.0);
    let width = total_width.unwrap_or(0.0);
    if length < CULVERT_MAX_LENGTH && width < CULVERT_MAX_WIDTH {
        StructureKind::Culvert
    } else {
        StructureKind::Bridge
    }
}

/// Resolves a feature's kind in place when it is still unknown.
pub fn resolve_kind(feature: &mut CanonicalFeature) {
    if !feature.structure_kind.is_resolved() {
        feature.structure_kind = classify_kind(
            &feature.construction_type,
            &feature.passage_type,
            &feature.structure_id,
            feature.total_length,
            feature.total_width,
        );
    }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
