#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pure conjunctive filtering over canonical structure features.
//!
//! A [`FilterCriteria`] is a set of optional predicates; a feature passes
//! when every active predicate passes. The default criteria match every
//! feature, so filtering with `FilterCriteria::default()` is the identity.

use serde::{Deserialize, Serialize};
use structure_map_source_models::CanonicalFeature;
use structure_map_structure_models::{ConditionRating, StructureKind};

/// An inclusive numeric interval applied to one dimensional attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Inclusive lower bound, zero when omitted.
    #[serde(default)]
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl NumericRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range from zero up to `max`, matching the dashboard sliders which
    /// always anchor at zero.
    #[must_use]
    pub const fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    /// Whether the attribute value falls inside the interval.
    ///
    /// A missing attribute passes vacuously: records that never carried a
    /// dimension are not hidden by a dimension slider.
    #[must_use]
    pub fn contains(&self, value: Option<f64>) -> bool {
        value.is_none_or(|v| v >= self.min && v <= self.max)
    }
}

/// The full set of dashboard filter controls.
///
/// Every field is optional; an absent field places no constraint. The
/// district comparison is exact against the normalized uppercase district
/// name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Normalized district name to match exactly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Structure kind to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StructureKind>,
    /// Condition rating to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionRating>,
    /// Bounds on total length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<NumericRange>,
    /// Bounds on total width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<NumericRange>,
    /// Bounds on maximum clear span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<NumericRange>,
}

impl FilterCriteria {
    /// `true` when no predicate is active, i.e. filtering is the identity.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.district.is_none()
            && self.kind.is_none()
            && self.condition.is_none()
            && self.length.is_none()
            && self.width.is_none()
            && self.span.is_none()
    }

    /// Whether a single feature satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, feature: &CanonicalFeature) -> bool {
        if let Some(district) = &self.district {
            if feature.district() != Some(district.as_str()) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if feature.structure_kind != kind {
                return false;
            }
        }
        if let Some(condition) = self.condition {
            if feature.condition_rating != condition {
                return false;
            }
        }
        if let Some(length) = &self.length {
            if !length.contains(feature.total_length) {
                return false;
            }
        }
        if let Some(width) = &self.width {
            if !width.contains(feature.total_width) {
                return false;
            }
        }
        if let Some(span) = &self.span {
            if !span.contains(feature.max_clear_span) {
                return false;
            }
        }
        true
    }
}

/// Returns the features satisfying `criteria`, preserving input order.
///
/// Filtering never mutates features, so applying the same criteria twice
/// returns the same set.
#[must_use]
pub fn filter_features<'a>(
    features: &'a [CanonicalFeature],
    criteria: &FilterCriteria,
) -> Vec<&'a CanonicalFeature> {
    features.iter().filter(|f| criteria.matches(f)).collect()
}
