//! Source loading with per-source baseline fallback.
//!
//! When two sources are configured their fetches run concurrently and the
//! pipeline waits for both to settle. Each source fails independently: a
//! source that cannot be fetched, parsed, or shape-detected degrades to
//! its own baseline slice while a succeeding sibling still contributes
//! real data. The loader therefore never returns an empty collection.

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use structure_map_source_models::{CanonicalFeature, SourceConfig, SourceDataset};

use crate::baseline::baseline_features;
use crate::classify::resolve_kind;
use crate::normalize::{NormalizedBatch, normalize_records};
use crate::shape::flatten;
use crate::SourceError;

/// Per-source outcome of one load pass, surfaced to the UI as a status
/// line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    /// The source's configured identifier.
    pub source_id: String,
    /// Which dataset variant the source carries.
    pub dataset: SourceDataset,
    /// Number of features this source contributed.
    pub loaded: usize,
    /// Number of malformed entries skipped during flattening.
    pub skipped: usize,
    /// Whether the embedded baseline was substituted for this source.
    pub used_baseline: bool,
    /// Human-readable status message.
    pub message: String,
}

/// The combined result of loading every configured source.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// All features, in source concatenation order.
    pub features: Vec<CanonicalFeature>,
    /// One status entry per configured source, in the same order.
    pub statuses: Vec<SourceStatus>,
}

impl LoadOutcome {
    /// `true` when at least one source fell back to baseline data.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.statuses.iter().any(|s| s.used_baseline)
    }

    /// Total count of malformed entries skipped across all sources.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.statuses.iter().map(|s| s.skipped).sum()
    }
}

/// Runs a parsed payload through shape detection, normalization, and
/// classification.
///
/// # Errors
///
/// Returns [`SourceError::UnrecognizedShape`] when the payload's top
/// level is not one of the recognized shapes.
pub fn parse_payload(
    dataset: SourceDataset,
    payload: &Value,
) -> Result<NormalizedBatch, SourceError> {
    let flattened = flatten(payload)?;
    let mut batch = normalize_records(dataset, &flattened);
    for feature in &mut batch.features {
        resolve_kind(feature);
    }
    Ok(batch)
}

/// Fetches and normalizes a single configured source.
///
/// URLs beginning with `http://`/`https://` are fetched over the network;
/// anything else is read from the local filesystem.
///
/// # Errors
///
/// Returns [`SourceError`] on transport failure, invalid JSON, or an
/// unrecognized top-level shape.
pub async fn fetch_dataset(
    client: &reqwest::Client,
    config: &SourceConfig,
) -> Result<NormalizedBatch, SourceError> {
    log::info!("Fetching {} from {}", config.name, config.url);
    let payload = fetch_payload(client, &config.url).await?;
    parse_payload(config.dataset, &payload)
}

async fn fetch_payload(client: &reqwest::Client, url: &str) -> Result<Value, SourceError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    } else {
        let raw = std::fs::read_to_string(url)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Loads every configured source concurrently, substituting each failing
/// source's baseline slice independently.
///
/// The returned features preserve configuration order (bridges before
/// culverts in the default deployment), and the outcome always carries at
/// least the baseline data — the pipeline is never left without features.
pub async fn load_all(client: &reqwest::Client, configs: &[SourceConfig]) -> LoadOutcome {
    let results = join_all(
        configs
            .iter()
            .map(|config| fetch_dataset(client, config)),
    )
    .await;

    let mut features = Vec::new();
    let mut statuses = Vec::with_capacity(configs.len());

    for (config, result) in configs.iter().zip(results) {
        match result {
            Ok(batch) => {
                if batch.skipped > 0 {
                    log::warn!(
                        "{}: skipped {} malformed records",
                        config.name,
                        batch.skipped
                    );
                }
                statuses.push(SourceStatus {
                    source_id: config.id.clone(),
                    dataset: config.dataset,
                    loaded: batch.features.len(),
                    skipped: batch.skipped,
                    used_baseline: false,
                    message: format!("Loaded {} features from {}", batch.features.len(), config.name),
                });
                features.extend(batch.features);
            }
            Err(e) => {
                log::warn!("{} unavailable ({e}), using baseline data", config.name);
                let fallback = baseline_features(config.dataset);
                statuses.push(SourceStatus {
                    source_id: config.id.clone(),
                    dataset: config.dataset,
                    loaded: fallback.len(),
                    skipped: 0,
                    used_baseline: true,
                    message: format!("{} unavailable ({e}); showing baseline data", config.name),
                });
                features.extend(fallback);
            }
        }
    }

    LoadOutcome { features, statuses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use structure_map_structure_models::StructureKind;

    fn config(id: &str, dataset: SourceDataset, url: &str) -> SourceConfig {
        SourceConfig {
            id: id.to_string(),
            name: format!("{id} inventory"),
            dataset,
            url: url.to_string(),
        }
    }

    #[test]
    fn parse_payload_classifies_every_feature() {
        let payload = json!([
            {"BRIDGEID": "X1", "MAIN_CONST": "RC SLAB", "TOTAL_LENG": 40.0},
            {"BRIDGEID": "X2", "MAINCONSTR": "PIPE CULVERT"},
            {"BRIDGEID": "X3", "TOTAL_LENG": 5.0, "TOTAL_WIDT": 3.0}
        ]);
        let batch = parse_payload(SourceDataset::Combined, &payload).unwrap();
        assert_eq!(batch.features.len(), 3);
        assert!(
            batch
                .features
                .iter()
                .all(|f| f.structure_kind.is_resolved())
        );
    }

    #[test]
    fn parse_payload_rejects_bad_shape() {
        let payload = json!({"unexpected": true});
        assert!(matches!(
            parse_payload(SourceDataset::Bridges, &payload),
            Err(SourceError::UnrecognizedShape { .. })
        ));
    }

    #[tokio::test]
    async fn all_sources_failing_yields_baseline() {
        let client = reqwest::Client::new();
        let configs = vec![
            config("bridges", SourceDataset::Bridges, "/nonexistent/BRIDGES.json"),
            config("culverts", SourceDataset::Culverts, "/nonexistent/CULVERTS.json"),
        ];

        let outcome = load_all(&client, &configs).await;

        assert!(!outcome.features.is_empty());
        assert!(outcome.is_degraded());
        assert!(outcome.statuses.iter().all(|s| s.used_baseline));
        // Bridges still come before culverts.
        let first_culvert = outcome
            .features
            .iter()
            .position(|f| f.structure_kind == StructureKind::Culvert)
            .unwrap();
        assert!(
            outcome.features[..first_culvert]
                .iter()
                .all(|f| f.structure_kind == StructureKind::Bridge)
        );
    }

    #[tokio::test]
    async fn one_source_failing_does_not_poison_the_other() {
        let dir = std::env::temp_dir().join("structure_map_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let bridges_path = dir.join("BRIDGES.json");
        std::fs::write(
            &bridges_path,
            json!([{"BRIDGEID": "B-REAL", "DISTRICT": "HYDERABAD", "Rating": "GOOD"}]).to_string(),
        )
        .unwrap();

        let client = reqwest::Client::new();
        let configs = vec![
            config(
                "bridges",
                SourceDataset::Bridges,
                bridges_path.to_str().unwrap(),
            ),
            config("culverts", SourceDataset::Culverts, "/nonexistent/CULVERTS.json"),
        ];

        let outcome = load_all(&client, &configs).await;

        assert!(outcome.is_degraded());
        assert!(!outcome.statuses[0].used_baseline);
        assert!(outcome.statuses[1].used_baseline);
        // The real bridge record survives alongside the culvert baseline.
        assert!(outcome.features.iter().any(|f| f.structure_id == "B-REAL"));
        assert!(
            outcome
                .features
                .iter()
                .any(|f| f.structure_kind == StructureKind::Culvert)
        );
    }

    #[tokio::test]
    async fn local_file_with_bad_shape_reports_and_falls_back() {
        let dir = std::env::temp_dir().join("structure_map_loader_shape_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("BAD.json");
        std::fs::write(&path, r#"{"rows": []}"#).unwrap();

        let client = reqwest::Client::new();
        let configs = vec![config(
            "bridges",
            SourceDataset::Bridges,
            path.to_str().unwrap(),
        )];

        let outcome = load_all(&client, &configs).await;
        assert!(outcome.is_degraded());
        assert!(outcome.statuses[0].message.contains("Unrecognized"));
        assert!(!outcome.features.is_empty());
    }
}
