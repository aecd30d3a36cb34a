#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Actix-Web API server for the structure map application.
//!
//! Serves the REST API for querying bridge and culvert features and the
//! static frontend. All queries are answered from the in-memory
//! [`FeatureStore`]; sources are fetched once at startup and again on
//! demand via the reload endpoint.

mod handlers;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use std::sync::RwLock;
use structure_map_source::loader;
use structure_map_source::registry;
use structure_map_source_models::SourceConfig;
use structure_map_store::FeatureStore;

/// Shared application state.
pub struct AppState {
    /// The current feature collection and its derived indexes.
    pub store: RwLock<FeatureStore>,
    /// HTTP client used for source fetches and reloads.
    pub client: reqwest::Client,
    /// Configured inventory sources, fetch order preserved.
    pub sources: Vec<SourceConfig>,
}

/// Starts the structure map API server.
///
/// Performs the initial source load (degrading to baseline data per
/// source if necessary), then starts the Actix-Web HTTP server. This is a
/// regular async function — the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the store lock is poisoned during the initial load.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let client = reqwest::Client::new();
    let mode = std::env::var("SOURCE_MODE").ok();
    let sources = registry::sources_for_mode(mode.as_deref());

    log::info!(
        "Loading structure sources ({} mode)...",
        mode.as_deref().unwrap_or("default")
    );
    let mut store = FeatureStore::new();
    let token = store.begin_reload();
    let outcome = loader::load_all(&client, &sources).await;
    // The very first token cannot be stale.
    store
        .replace(token, outcome)
        .expect("initial load superseded");
    log::info!(
        "Serving {} features across {} districts",
        store.features().len(),
        store.districts().len()
    );

    let state = web::Data::new(AppState {
        store: RwLock::new(store),
        client,
        sources,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/features", web::get().to(handlers::features))
                    .route("/districts", web::get().to(handlers::districts))
                    .route("/stats", web::get().to(handlers::stats))
                    .route("/ranges", web::get().to(handlers::ranges))
                    .route("/export", web::get().to(handlers::export))
                    .route("/status", web::get().to(handlers::status))
                    .route("/reload", web::post().to(handlers::reload)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
