#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The launch-site analysis pipeline.
//!
//! Control flow: candidate generation runs first (it needs only the
//! polygon layers), then the four enrichment components (accessibility,
//! visibility, security proximity, elevation) each write their own
//! candidate fields. Scoring is a strict barrier: it starts only once
//! every enrichment field is populated. Aggregation runs last.
//!
//! Everything a request touches (configuration, spatial indexes,
//! candidate set) is built per request and owned by the pipeline call, so
//! concurrent requests share no mutable state. Of the error taxonomy only
//! configuration errors surface to the caller; empty layers, malformed
//! polygons, unreachable elevation, and empty indexes all degrade into
//! sentinels, fallbacks, and statistics.

pub mod aggregate;
pub mod config;
pub mod generate;
pub mod input;
pub mod output;
pub mod scoring;

pub use config::{AnalysisConfig, ConfigError};
pub use input::AnalysisRequest;
pub use output::{AnalysisResponse, build_response};

use geo::Point;
use launch_map_elevation::ElevationClient;
use launch_map_geometry::LocalProjector;
use launch_map_models::{
    AnalysisStats, Candidate, LayerBundle, RoadClass, SECURITY_SENTINEL_M, Target,
};
use launch_map_spatial::{RoadIndex, SecurityIndex, is_hidden};
use thiserror::Error;

/// Errors surfaced by the pipeline. Everything except configuration
/// problems degrades instead of erroring.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Configuration rejected before any processing began.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The result of one pipeline run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// The protected point, with enriched elevation.
    pub target: Target,
    /// Scored candidates in stable generation order.
    pub candidates: Vec<Candidate>,
    /// Aggregated statistics.
    pub stats: AnalysisStats,
}

/// Runs the full analysis pipeline over one request's layers.
///
/// `elevation` is the external enrichment client; `None` runs offline and
/// assigns the documented 0.0 fallback throughout (the same degradation
/// the client itself applies when the service is unreachable).
///
/// # Errors
///
/// Returns [`AnalysisError::Config`] if the configuration fails
/// validation. All other fault classes degrade gracefully.
pub async fn analyze(
    layers: &LayerBundle,
    target_geo: Point<f64>,
    config: &AnalysisConfig,
    elevation: Option<&ElevationClient>,
) -> Result<AnalysisOutcome, AnalysisError> {
    config.validate()?;

    let projector = LocalProjector::new(target_geo);
    let target_m = projector.project(target_geo);

    log::info!(
        "analysis start: {} buildings, {} surfaces, {} road nodes, {} security assets",
        layers.buildings.len(),
        layers.surfaces.len(),
        layers.roads.nodes.len(),
        layers.security.len()
    );

    let generated = generate::generate(layers, &projector, target_m, config);
    let mut candidates = generated.candidates;

    // Accessibility and visibility. Both read the nearest road node, so
    // they share one query per candidate.
    let road_index = RoadIndex::build(&layers.roads, &projector);
    if road_index.is_empty() {
        log::warn!("road graph is empty; candidates degrade to infinite road distance");
    }
    for candidate in &mut candidates {
        if let Some(road) = road_index.nearest(candidate.centroid_m) {
            candidate.dist_to_road = road.distance;
            candidate.nearest_road_class = road.class;
            candidate.is_hidden =
                is_hidden(candidate.centroid_m, road.position, &generated.buildings_union);
        } else {
            candidate.dist_to_road = f64::INFINITY;
            candidate.nearest_road_class = RoadClass::Unknown;
            candidate.is_hidden = false;
        }
    }

    // Security proximity.
    let security_index = SecurityIndex::build(&layers.security, &projector);
    for candidate in &mut candidates {
        candidate.nearest_security_dist = security_index
            .nearest(candidate.centroid_m)
            .map_or(SECURITY_SENTINEL_M, |asset| asset.distance);
    }

    // Elevation: target first, then every candidate centroid, one
    // position-aligned batch run.
    let mut coords = Vec::with_capacity(candidates.len() + 1);
    coords.push(target_geo);
    coords.extend(candidates.iter().map(|c| c.centroid_geo));
    let elevations = match elevation {
        Some(client) => client.elevations(&coords).await,
        None => {
            log::info!("offline mode: elevation fallback 0.0 for {} coordinates", coords.len());
            vec![0.0; coords.len()]
        }
    };
    let target_elevation = elevations.first().copied().unwrap_or(0.0);
    for (candidate, value) in candidates.iter_mut().zip(elevations.iter().skip(1)) {
        candidate.elevation = *value;
    }

    // Scoring barrier: every enrichment field above is now populated.
    for candidate in &mut candidates {
        let (factors, score) = scoring::score_candidate(candidate, target_elevation, &config.weights);
        candidate.factors = Some(factors);
        candidate.threat_score = score;
    }

    let stats = aggregate::compute_stats(&candidates, generated.invalid_geometry_count, config);
    log::info!(
        "analysis complete: {} candidates (mean threat {:.1}, max {:.1})",
        stats.total_candidates,
        stats.mean_threat_score,
        stats.max_threat_score
    );

    Ok(AnalysisOutcome {
        target: Target {
            geographic: target_geo,
            projected: target_m,
            elevation: target_elevation,
        },
        candidates,
        stats,
    })
}
