#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data source configuration types and the canonical feature format.
//!
//! Every structure inventory source (bridge register, culvert register, or
//! a combined export) produces [`CanonicalFeature`] records that conform to
//! the shared taxonomy in [`structure_map_structure_models`].

use serde::{Deserialize, Serialize};
use structure_map_structure_models::{ConditionRating, StructureKind};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which input source produced a feature.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceDataset {
    /// Dedicated bridge inventory (pre-classified as bridges)
    Bridges,
    /// Dedicated culvert inventory (pre-classified as culverts)
    Culverts,
    /// Combined inventory — structure kind resolved by the classifier
    Combined,
}

impl SourceDataset {
    /// The structure kind implied by the dataset itself, when the source
    /// already disambiguates bridge vs culvert. `None` for combined
    /// deployments, where the classifier decides per feature.
    #[must_use]
    pub const fn assumed_kind(self) -> Option<StructureKind> {
        match self {
            Self::Bridges => Some(StructureKind::Bridge),
            Self::Culverts => Some(StructureKind::Culvert),
            Self::Combined => None,
        }
    }
}

/// Configuration for a structure inventory source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Unique identifier for this source (e.g., `"bridges"`).
    pub id: String,
    /// Human-readable name (e.g., `"Provincial Bridge Inventory"`).
    pub name: String,
    /// Which dataset variant this source carries.
    pub dataset: SourceDataset,
    /// URL or path of the JSON resource.
    pub url: String,
}

/// A structure record normalized to the canonical schema.
///
/// All sources produce this type after shape detection, field mapping, and
/// classification. Dimensions are optional — a missing or non-finite source
/// value is `None`, never `NaN`, so the filter and aggregator can tell
/// "absent" from "zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFeature {
    /// Longitude (WGS84). `0.0` when unresolvable from the source.
    pub longitude: f64,
    /// Latitude (WGS84). `0.0` when unresolvable from the source.
    pub latitude: f64,
    /// District name, trimmed and upper-cased. Empty when absent.
    pub district_name: String,
    /// Source-assigned structure identifier (e.g., `"10B"`, `"30C"`).
    pub structure_id: String,
    /// Name of the road carrying or crossed by the structure.
    pub road_name: String,
    /// Free-text construction type (e.g., `"CONT. RC SLAB BRIDGE"`).
    pub construction_type: String,
    /// Free-text passage type (e.g., `"IRRIGATION CHANNEL"`).
    pub passage_type: String,
    /// Total structure length in metres.
    pub total_length: Option<f64>,
    /// Total deck/roadway width in metres.
    pub total_width: Option<f64>,
    /// Maximum clear span in metres.
    pub max_clear_span: Option<f64>,
    /// Condition rating from the canonical taxonomy.
    pub condition_rating: ConditionRating,
    /// Structure kind — never [`StructureKind::Unknown`] once classified.
    pub structure_kind: StructureKind,
    /// Which input source produced this feature.
    pub source_dataset: SourceDataset,
}

impl CanonicalFeature {
    /// Returns the normalized district name, or `None` when the source
    /// record had no usable district.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        if self.district_name.is_empty() {
            None
        } else {
            Some(&self.district_name)
        }
    }
}

/// Normalizes a raw district value for comparison and indexing.
///
/// Trims whitespace and upper-cases; empty, `"null"`, and `"undefined"`
/// values are treated as absent.
#[must_use]
pub fn normalize_district(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("undefined")
    {
        return None;
    }
    Some(trimmed.to_uppercase())
}
