#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory feature store with a guarded reload lifecycle.
//!
//! The store holds the current feature collection and its derived district
//! index. Reloads replace the collection wholesale: a reload obtains a
//! [`ReloadToken`], fetches in the background, and commits with
//! [`FeatureStore::replace`]. Starting a newer reload invalidates every
//! earlier token, so a slow stale fetch can never clobber fresher data.

pub mod export;

use serde::Serialize;
use structure_map_source::loader::{LoadOutcome, SourceStatus};
use structure_map_source_models::CanonicalFeature;

/// Errors from store lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A commit arrived with a token that a newer reload has superseded.
    #[error("Stale reload: token generation {token} superseded by {current}")]
    StaleReload {
        /// Generation the late commit was started under.
        token: u64,
        /// Generation currently in progress.
        current: u64,
    },
}

/// Lifecycle state of the store's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "state", content = "message")]
pub enum LoadState {
    /// Initial load in progress; no data yet.
    Loading,
    /// A collection is loaded and current.
    Ready,
    /// A reload is in progress; the previous collection is still served.
    Reloading,
    /// The most recent load attempt failed; the last good collection (if
    /// any) is still served.
    Failed(String),
}

/// Proof that a reload was started under a specific generation. Commit
/// operations take the token back and reject it once superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadToken {
    generation: u64,
}

/// The current feature collection plus everything derived from it.
#[derive(Debug)]
pub struct FeatureStore {
    features: Vec<CanonicalFeature>,
    districts: Vec<String>,
    statuses: Vec<SourceStatus>,
    skipped: usize,
    state: LoadState,
    generation: u64,
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStore {
    /// An empty store awaiting its initial load.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
            districts: Vec::new(),
            statuses: Vec::new(),
            skipped: 0,
            state: LoadState::Loading,
            generation: 0,
        }
    }

    /// Starts a (re)load, invalidating any token from an earlier call.
    pub fn begin_reload(&mut self) -> ReloadToken {
        self.generation += 1;
        self.state = if self.features.is_empty() {
            LoadState::Loading
        } else {
            LoadState::Reloading
        };
        ReloadToken {
            generation: self.generation,
        }
    }

    /// Commits a load outcome, replacing the collection wholesale and
    /// recomputing the district index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StaleReload`] when a newer reload has started
    /// since `token` was issued; the store is left untouched.
    pub fn replace(&mut self, token: ReloadToken, outcome: LoadOutcome) -> Result<(), StoreError> {
        self.check_token(token)?;
        log::info!(
            "Store generation {}: {} features from {} sources",
            token.generation,
            outcome.features.len(),
            outcome.statuses.len()
        );
        self.skipped = outcome.skipped();
        self.districts = district_index(&outcome.features);
        self.features = outcome.features;
        self.statuses = outcome.statuses;
        self.state = LoadState::Ready;
        Ok(())
    }

    /// Records a failed load attempt. The previous collection, if any,
    /// remains served.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StaleReload`] when a newer reload has started
    /// since `token` was issued.
    pub fn mark_failed(
        &mut self,
        token: ReloadToken,
        message: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.check_token(token)?;
        let message = message.into();
        log::warn!("Load generation {} failed: {message}", token.generation);
        self.state = LoadState::Failed(message);
        Ok(())
    }

    const fn check_token(&self, token: ReloadToken) -> Result<(), StoreError> {
        if token.generation == self.generation {
            Ok(())
        } else {
            Err(StoreError::StaleReload {
                token: token.generation,
                current: self.generation,
            })
        }
    }

    /// The current feature collection, in source concatenation order.
    #[must_use]
    pub fn features(&self) -> &[CanonicalFeature] {
        &self.features
    }

    /// Sorted, deduplicated district names from the unfiltered collection.
    #[must_use]
    pub fn districts(&self) -> &[String] {
        &self.districts
    }

    /// Per-source statuses from the last committed load.
    #[must_use]
    pub fn statuses(&self) -> &[SourceStatus] {
        &self.statuses
    }

    /// Count of malformed records skipped in the last committed load.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// `true` when any source in the last committed load fell back to its
    /// baseline slice.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.statuses.iter().any(|s| s.used_baseline)
    }
}

/// Sorted, deduplicated index of normalized district names. Features
/// without a usable district contribute nothing.
#[must_use]
pub fn district_index(features: &[CanonicalFeature]) -> Vec<String> {
    let mut districts: Vec<String> = features
        .iter()
        .filter_map(|f| f.district().map(str::to_string))
        .collect();
    districts.sort();
    districts.dedup();
    districts
}
