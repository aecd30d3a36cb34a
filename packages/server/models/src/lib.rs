#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! API request and response types for the structure map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types to allow independent evolution of the API
//! contract.

use serde::{Deserialize, Serialize};
use structure_map_filter::{FilterCriteria, NumericRange};
use structure_map_source::loader::SourceStatus;
use structure_map_source_models::normalize_district;
use structure_map_stats::AggregateStats;
use structure_map_store::{FeatureStore, LoadState};
use structure_map_structure_models::{ConditionRating, StructureKind};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters shared by the features and stats endpoints.
///
/// All parameters are optional; an absent parameter places no constraint,
/// and the frontend's select controls send the literal `all` for the same
/// effect. Dimension bounds are split into `min*`/`max*` pairs so the
/// sliders can send either side independently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureQueryParams {
    /// District name, or `all`; compared case- and whitespace-insensitively.
    pub district: Option<String>,
    /// Structure kind (`all`/`BRIDGE`/`CULVERT`/`OTHER`).
    pub kind: Option<String>,
    /// Condition rating (`all` or `EXCELLENT`/`GOOD`/`FAIR`/`POOR`).
    pub condition: Option<String>,
    pub min_length: Option<f64>,
    pub max_length: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_span: Option<f64>,
    pub max_span: Option<f64>,
}

impl FeatureQueryParams {
    /// Lowers the query parameters onto filter criteria.
    ///
    /// A case-insensitive `all` in any select parameter places no
    /// constraint, matching the frontend's "All" options. The district
    /// value is normalized the same way stored districts are, so
    /// `?district=sujawal` matches `SUJAWAL`.
    #[must_use]
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            district: selected(&self.district).and_then(normalize_district),
            kind: selected(&self.kind).and_then(parse_enum::<StructureKind>),
            condition: selected(&self.condition).and_then(parse_enum::<ConditionRating>),
            length: range_from(self.min_length, self.max_length),
            width: range_from(self.min_width, self.max_width),
            span: range_from(self.min_span, self.max_span),
        }
    }
}

/// An actual selection, or `None` for absent/blank/`all` values.
fn selected(param: &Option<String>) -> Option<&str> {
    let value = param.as_deref()?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(value)
    }
}

fn parse_enum<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.to_uppercase().parse().ok()
}

fn range_from(min: Option<f64>, max: Option<f64>) -> Option<NumericRange> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(NumericRange::new(
        min.unwrap_or(0.0),
        max.unwrap_or(f64::MAX),
    ))
}

/// The sorted district index.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistricts {
    pub districts: Vec<String>,
}

/// Aggregate statistics for a filtered subset, alongside the unfiltered
/// per-kind totals the dashboard's header counters show.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Statistics over the features matching the query.
    pub filtered: AggregateStats,
    /// Unfiltered bridge count.
    pub total_bridges: usize,
    /// Unfiltered culvert count.
    pub total_culverts: usize,
}

/// Load status of the feature store, returned by the reload endpoint and
/// included in health reporting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoadStatus {
    /// Store lifecycle state.
    pub state: LoadState,
    /// Total features currently served.
    pub total: usize,
    /// Whether any source fell back to baseline data.
    pub degraded: bool,
    /// Malformed records skipped during the last load.
    pub skipped: usize,
    /// Per-source status lines.
    pub sources: Vec<SourceStatus>,
}

impl ApiLoadStatus {
    /// Snapshots the store's current load status.
    #[must_use]
    pub fn from_store(store: &FeatureStore) -> Self {
        Self {
            state: store.state().clone(),
            total: store.features().len(),
            degraded: store.is_degraded(),
            skipped: store.skipped(),
            sources: store.statuses().to_vec(),
        }
    }
}
