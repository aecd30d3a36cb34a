//! HTTP handler functions for the structure map API.

use actix_web::{HttpResponse, web};
use geojson::FeatureCollection;
use structure_map_filter::filter_features;
use structure_map_server_models::{ApiDistricts, ApiHealth, ApiLoadStatus, ApiStats, FeatureQueryParams};
use structure_map_source::loader;
use structure_map_source_models::CanonicalFeature;
use structure_map_stats::{AggregateStats, SliderRanges};
use structure_map_store::export::{ExportDocument, to_geojson};
use structure_map_store::FeatureStore;
use structure_map_structure_models::StructureKind;

use crate::AppState;

fn read_store(state: &AppState) -> std::sync::RwLockReadGuard<'_, FeatureStore> {
    state.store.read().expect("store lock poisoned")
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/features`
///
/// Returns the features matching the query as a GeoJSON FeatureCollection.
pub async fn features(
    state: web::Data<AppState>,
    params: web::Query<FeatureQueryParams>,
) -> HttpResponse {
    let store = read_store(&state);
    let criteria = params.to_criteria();
    let features: Vec<geojson::Feature> = filter_features(store.features(), &criteria)
        .into_iter()
        .map(to_geojson)
        .collect();

    HttpResponse::Ok().json(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// `GET /api/districts`
///
/// Returns the sorted district index from the unfiltered collection.
pub async fn districts(state: web::Data<AppState>) -> HttpResponse {
    let store = read_store(&state);
    HttpResponse::Ok().json(ApiDistricts {
        districts: store.districts().to_vec(),
    })
}

/// `GET /api/stats`
///
/// Returns aggregate statistics for the features matching the query,
/// alongside the unfiltered per-kind totals.
pub async fn stats(
    state: web::Data<AppState>,
    params: web::Query<FeatureQueryParams>,
) -> HttpResponse {
    let store = read_store(&state);
    let criteria = params.to_criteria();
    let subset: Vec<CanonicalFeature> = filter_features(store.features(), &criteria)
        .into_iter()
        .cloned()
        .collect();

    let count_kind = |kind| {
        store
            .features()
            .iter()
            .filter(|f| f.structure_kind == kind)
            .count()
    };

    HttpResponse::Ok().json(ApiStats {
        filtered: AggregateStats::compute(&subset),
        total_bridges: count_kind(StructureKind::Bridge),
        total_culverts: count_kind(StructureKind::Culvert),
    })
}

/// `GET /api/ranges`
///
/// Returns data-driven maxima for the dimension sliders.
pub async fn ranges(state: web::Data<AppState>) -> HttpResponse {
    let store = read_store(&state);
    HttpResponse::Ok().json(SliderRanges::compute(store.features()))
}

/// `GET /api/export`
///
/// Returns the full collection as a kind-partitioned export document.
pub async fn export(state: web::Data<AppState>) -> HttpResponse {
    let store = read_store(&state);
    HttpResponse::Ok().json(ExportDocument::build(store.features()))
}

/// `GET /api/status`
///
/// Returns the store's load status and per-source status lines.
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let store = read_store(&state);
    HttpResponse::Ok().json(ApiLoadStatus::from_store(&store))
}

/// `POST /api/reload`
///
/// Re-fetches every configured source and swaps the collection in. A
/// reload superseded by a newer one while its fetch was in flight is
/// discarded with `409 Conflict`.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    let token = state
        .store
        .write()
        .expect("store lock poisoned")
        .begin_reload();

    let outcome = loader::load_all(&state.client, &state.sources).await;

    let mut store = state.store.write().expect("store lock poisoned");
    match store.replace(token, outcome) {
        Ok(()) => HttpResponse::Ok().json(ApiLoadStatus::from_store(&store)),
        Err(e) => {
            log::warn!("Reload discarded: {e}");
            HttpResponse::Conflict().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}
