#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Structure taxonomy types: kind and condition rating.
//!
//! This crate defines the canonical classification enums used across the
//! entire structure-map system. All data sources normalize their
//! source-specific type and rating strings into this shared taxonomy.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What kind of road structure a feature represents.
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
pub enum StructureKind {
    /// A road bridge (slab, truss, girder, etc.)
    Bridge,
    /// A culvert (box, pipe, arch, irrigation/drainage crossing)
    Culvert,
    /// A structure that is neither a bridge nor a culvert
    Other,
    /// Not yet classified — resolved by the classifier before storage
    Unknown,
}

impl StructureKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Bridge, Self::Culvert, Self::Other, Self::Unknown]
    }

    /// Returns `true` once the classifier has assigned a concrete kind.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Coarse four-level health assessment of a structure.
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
pub enum ConditionRating {
    /// Structure in excellent condition
    Excellent,
    /// Structure in good condition
    Good,
    /// Structure in fair condition
    Fair,
    /// Structure in poor condition
    Poor,
    /// Rating missing or unrecognized in the source record
    Unknown,
}

impl ConditionRating {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Excellent,
            Self::Good,
            Self::Fair,
            Self::Poor,
            Self::Unknown,
        ]
    }

    /// The four real ratings counted in condition tallies. [`Self::Unknown`]
    /// is ignored, not miscounted.
    #[must_use]
    pub const fn tallied() -> &'static [Self] {
        &[Self::Excellent, Self::Good, Self::Fair, Self::Poor]
    }

    /// Maps a raw rating string from any source onto the taxonomy.
    ///
    /// Matching is case-insensitive after trimming; unrecognized or empty
    /// values map to [`Self::Unknown`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "EXCELLENT" => Self::Excellent,
            "GOOD" => Self::Good,
            "FAIR" => Self::Fair,
            "POOR" => Self::Poor,
            _ => Self::Unknown,
        }
    }
}
