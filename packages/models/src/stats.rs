//! Summary statistics emitted alongside the candidate collection.

use serde::{Deserialize, Serialize};

/// The statistics record computed by the aggregator over a scored
/// candidate set.
///
/// An empty candidate set yields the all-zero record: means and extrema
/// report 0.0 rather than NaN so the record is always serializable without
/// surprises downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_candidates: usize,

    // Per-family counts.
    pub alley_count: usize,
    pub vegetation_count: usize,
    pub building_count: usize,

    // Score bands: critical > 80, high 50–80, medium < 50.
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,

    // Visibility.
    pub hidden_count: usize,
    pub exposed_count: usize,

    // Security proximity zones (statistics only, never scored).
    pub near_security_count: usize,
    pub security_monitored_count: usize,

    /// Source polygons skipped as malformed during generation.
    pub invalid_geometry_count: usize,

    pub mean_threat_score: f64,
    pub min_threat_score: f64,
    pub max_threat_score: f64,

    /// Estimated flight time statistics in seconds, at the configured
    /// drone speed.
    pub mean_flight_time: f64,
    pub min_flight_time: f64,
    pub max_flight_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zero() {
        let stats = AnalysisStats::default();
        assert_eq!(stats.total_candidates, 0);
        assert!((stats.mean_threat_score - 0.0).abs() < f64::EPSILON);
        assert!((stats.max_flight_time - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(AnalysisStats::default()).unwrap();
        assert!(json.get("near_security_count").is_some());
        assert!(json.get("security_monitored_count").is_some());
        assert!(json.get("mean_threat_score").is_some());
    }
}
