#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for crime risk hotspot analysis.
//!
//! Every endpoint is stateless: the client posts a batch of incidents,
//! predictions or patrol suggestions and receives the computed hotspots or statistics. The only
//! shared state is the default clustering configuration, loaded once at
//! startup from the TOML file named by `CRIME_RISK_CONFIG`.

mod handlers;

use std::path::Path;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error, middleware, web};
use crime_risk_hotspot::{ClusterConfig, load_config};

/// Upper bound on request bodies, in bytes.
const JSON_LIMIT: usize = 16 * 1024 * 1024;

/// Shared application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Clustering configuration used when a request does not carry one.
    pub default_config: ClusterConfig,
}

/// Registers the `/api` routes.
///
/// Malformed JSON bodies are answered with `400` and an `{"error": ...}`
/// body, matching the handlers' own validation errors.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let message = err.to_string();
            log::debug!("Rejected request body: {message}");
            error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
            )
            .into()
        });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .route("/health", web::get().to(handlers::health))
            .route("/hotspots", web::post().to(handlers::hotspots))
            .route("/hotspots/geojson", web::post().to(handlers::hotspots_geojson))
            .route(
                "/predictions/statistics",
                web::post().to(handlers::prediction_statistics),
            )
            .route(
                "/suggestions/metrics",
                web::post().to(handlers::suggestion_metrics_handler),
            )
            .route("/distance", web::get().to(handlers::distance)),
    );
}

/// Starts the crime risk API server.
///
/// Reads `BIND_ADDR` (default `127.0.0.1`), `PORT` (default `8080`) and
/// `CRIME_RISK_CONFIG` from the environment. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration file cannot be
/// loaded, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let default_config = match std::env::var("CRIME_RISK_CONFIG") {
        Ok(path) => load_config(Path::new(&path)).map_err(std::io::Error::other)?,
        Err(_) => {
            log::info!("CRIME_RISK_CONFIG not set, using default cluster config");
            ClusterConfig::default()
        }
    };

    let state = web::Data::new(AppState { default_config });

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
            .configure(configure_api)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
