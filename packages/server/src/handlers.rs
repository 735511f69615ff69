//! HTTP handler functions for the launch-map API.

use actix_web::{HttpResponse, web};
use launch_map_analysis::{AnalysisConfig, AnalysisError, AnalysisRequest, build_response};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "healthy": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /api/analyze`
///
/// Runs the full analysis pipeline over the layers in the request body.
/// Configuration problems (e.g. a radius outside the supported bounds)
/// are rejected with 400 before any processing; every other fault class
/// degrades inside the engine and is reflected only in the statistics.
pub async fn analyze(
    state: web::Data<AppState>,
    request: web::Json<AnalysisRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    let config = AnalysisConfig {
        search_radius_m: request.radius_m,
        ..AnalysisConfig::default()
    };
    let layers = request.layer_bundle();

    match launch_map_analysis::analyze(
        &layers,
        request.target_point(),
        &config,
        Some(&state.elevation),
    )
    .await
    {
        Ok(outcome) => HttpResponse::Ok().json(build_response(&outcome, &layers.security, &config)),
        Err(AnalysisError::Config(e)) => {
            log::warn!("rejected analysis request: {e}");
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}
