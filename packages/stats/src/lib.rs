#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aggregation over canonical structure features.
//!
//! Statistics are computed synchronously from whatever slice the caller
//! passes, so the same functions serve both the unfiltered collection and
//! a filtered subset. Inputs are never mutated.

use serde::Serialize;
use structure_map_source_models::CanonicalFeature;
use structure_map_structure_models::{ConditionRating, StructureKind};

/// Counts of the four real condition ratings.
///
/// [`ConditionRating::Unknown`] is ignored rather than miscounted into a
/// bucket, so the bucket sum can be less than the feature count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionTally {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl ConditionTally {
    /// Tallies the ratings of every feature in the iterator.
    pub fn from_features<'a>(features: impl IntoIterator<Item = &'a CanonicalFeature>) -> Self {
        let mut tally = Self::default();
        for feature in features {
            match feature.condition_rating {
                ConditionRating::Excellent => tally.excellent += 1,
                ConditionRating::Good => tally.good += 1,
                ConditionRating::Fair => tally.fair += 1,
                ConditionRating::Poor => tally.poor += 1,
                ConditionRating::Unknown => {}
            }
        }
        tally
    }

    /// Sum of all four buckets.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.excellent + self.good + self.fair + self.poor
    }
}

/// Statistics for one structure kind within a feature slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSummary {
    /// Number of features of this kind.
    pub count: usize,
    /// Condition rating tallies.
    pub conditions: ConditionTally,
    /// Mean total length over recorded values, one decimal place.
    pub mean_length: String,
    /// Mean total width over recorded values, one decimal place.
    pub mean_width: String,
    /// Mean maximum clear span over recorded values, one decimal place.
    pub mean_span: String,
}

/// The full aggregate view of a feature slice, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Total number of features in the slice.
    pub total: usize,
    pub bridges: KindSummary,
    pub culverts: KindSummary,
}

impl AggregateStats {
    /// Computes per-kind tallies and dimension means for a feature slice.
    #[must_use]
    pub fn compute(features: &[CanonicalFeature]) -> Self {
        Self {
            total: features.len(),
            bridges: kind_summary(features, StructureKind::Bridge),
            culverts: kind_summary(features, StructureKind::Culvert),
        }
    }
}

fn kind_summary(features: &[CanonicalFeature], kind: StructureKind) -> KindSummary {
    let subset: Vec<&CanonicalFeature> = features
        .iter()
        .filter(|f| f.structure_kind == kind)
        .collect();
    KindSummary {
        count: subset.len(),
        conditions: ConditionTally::from_features(subset.iter().copied()),
        mean_length: format_mean(subset.iter().filter_map(|f| f.total_length)),
        mean_width: format_mean(subset.iter().filter_map(|f| f.total_width)),
        mean_span: format_mean(subset.iter().filter_map(|f| f.max_clear_span)),
    }
}

/// Data-driven maxima for the dashboard's dimension sliders.
///
/// Each maximum is the largest observed value plus headroom, floored so
/// the sliders stay usable on sparse datasets: length never below 100,
/// width never below 20, span never below 50.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderRanges {
    pub max_length: f64,
    pub max_width: f64,
    pub max_span: f64,
}

impl SliderRanges {
    #[must_use]
    pub fn compute(features: &[CanonicalFeature]) -> Self {
        Self {
            max_length: padded_max(features.iter().filter_map(|f| f.total_length), 100.0, 10.0),
            max_width: padded_max(features.iter().filter_map(|f| f.total_width), 20.0, 5.0),
            max_span: padded_max(features.iter().filter_map(|f| f.max_clear_span), 50.0, 10.0),
        }
    }
}

fn padded_max(values: impl Iterator<Item = f64>, floor: f64, pad: f64) -> f64 {
    // Observed maxima are rounded up to whole metres before padding so the
    // slider bounds stay integral.
    let observed = values.fold(0.0_f64, f64::max).ceil();
    floor.max(observed + pad)
}

/// Mean of the contributing values, rendered with one decimal place.
/// An empty contribution set renders as `"0.0"` rather than NaN.
fn format_mean(values: impl Iterator<Item = f64>) -> String {
    let mut sum = 0.0;
    let mut count = 0_usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        "0.0".to_string()
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / count as f64;
        format!("{mean:.1}")
    }
}
