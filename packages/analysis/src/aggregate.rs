//! Summary statistics over the scored candidate set.

use launch_map_models::{AnalysisStats, Candidate, CandidateKind, ThreatBand};

use crate::config::AnalysisConfig;

/// Computes the statistics record for a scored candidate set.
///
/// An empty set yields the all-zero record; means and extrema never
/// divide by zero or emit NaN.
#[must_use]
pub fn compute_stats(
    candidates: &[Candidate],
    invalid_geometry_count: usize,
    config: &AnalysisConfig,
) -> AnalysisStats {
    let mut stats = AnalysisStats {
        total_candidates: candidates.len(),
        invalid_geometry_count,
        ..AnalysisStats::default()
    };

    if candidates.is_empty() {
        return stats;
    }

    let mut threat_sum = 0.0;
    let mut flight_sum = 0.0;
    stats.min_threat_score = f64::INFINITY;
    stats.max_threat_score = f64::NEG_INFINITY;
    stats.min_flight_time = f64::INFINITY;
    stats.max_flight_time = f64::NEG_INFINITY;

    for candidate in candidates {
        match candidate.kind {
            CandidateKind::Alley => stats.alley_count += 1,
            CandidateKind::Vegetation => stats.vegetation_count += 1,
            CandidateKind::Building => stats.building_count += 1,
        }

        match ThreatBand::from_score(candidate.threat_score) {
            ThreatBand::Critical => stats.critical_count += 1,
            ThreatBand::High => stats.high_count += 1,
            ThreatBand::Medium => stats.medium_count += 1,
        }

        if candidate.is_hidden {
            stats.hidden_count += 1;
        } else {
            stats.exposed_count += 1;
        }

        // Monitored includes the near-security core, matching the wire
        // contract: both are plain "closer than threshold" counts.
        if candidate.nearest_security_dist < config.security_zones.near_m {
            stats.near_security_count += 1;
        }
        if candidate.nearest_security_dist < config.security_zones.monitored_m {
            stats.security_monitored_count += 1;
        }

        threat_sum += candidate.threat_score;
        stats.min_threat_score = stats.min_threat_score.min(candidate.threat_score);
        stats.max_threat_score = stats.max_threat_score.max(candidate.threat_score);

        let flight_time = candidate.est_flight_time(config.drone_speed_mps);
        flight_sum += flight_time;
        stats.min_flight_time = stats.min_flight_time.min(flight_time);
        stats.max_flight_time = stats.max_flight_time.max(flight_time);
    }

    let count = candidates.len() as f64;
    stats.mean_threat_score = threat_sum / count;
    stats.mean_flight_time = flight_sum / count;

    stats
}
