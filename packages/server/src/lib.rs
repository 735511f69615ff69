#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the launch-map analysis engine.
//!
//! Exposes the analysis pipeline over HTTP: `POST /api/analyze` takes a
//! request document (target point, retrieval radius, input layers) and
//! returns the response envelope with statistics and scored candidate
//! features; `GET /api/health` reports liveness. CORS is permissive so a
//! map frontend on any origin can call the API directly.
//!
//! Each request runs against its own configuration and candidate set;
//! the only state shared across requests is the elevation client's
//! connection pool.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use launch_map_elevation::{ElevationClient, ElevationConfig};

/// Shared application state.
pub struct AppState {
    /// Elevation enrichment client, shared for connection reuse.
    pub elevation: ElevationClient,
}

/// Starts the launch-map API server.
///
/// Binds to `BIND_ADDR`/`PORT` (defaults `127.0.0.1:8080`). This is a
/// regular async function; the caller provides the async runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let state = web::Data::new(AppState {
        elevation: ElevationClient::new(ElevationConfig::default()),
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
                    .route("/analyze", web::post().to(handlers::analyze)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
