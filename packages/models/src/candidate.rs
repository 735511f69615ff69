//! The candidate work item and its scoring attributes.
//!
//! Candidates are created once by the generator, enriched in place by the
//! accessibility, visibility, security, and elevation components (each
//! writes only its own fields), scored once, and then treated as
//! immutable.

use geo::{Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::{CandidateKind, RoadClass, SECURITY_SENTINEL_M, SecurityZone};

/// The protected point at the center of an analysis. Immutable once set,
/// apart from the elevation enrichment.
#[derive(Debug, Clone)]
pub struct Target {
    /// Geographic coordinates (lon/lat, WGS84).
    pub geographic: Point<f64>,
    /// Coordinates in the locally-accurate metric frame.
    pub projected: Point<f64>,
    /// Elevation in meters, enriched from the elevation service
    /// (0.0 fallback when unavailable).
    pub elevation: f64,
}

/// The seven per-factor normalized scores, each an integer in 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScores {
    pub dist_to_target: u8,
    pub building_structure: u8,
    pub road_class: u8,
    pub elevation_profile: u8,
    pub land_cover: u8,
    pub visual_exposure: u8,
    pub terrain: u8,
}

/// A potential drone-launch site under analysis.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Stable integer id, assigned in generation order.
    pub id: u64,
    /// Candidate family.
    pub kind: CandidateKind,
    /// Polygon in the projected metric frame.
    pub polygon_m: Polygon<f64>,
    /// Polygon in geographic coordinates, for serialization.
    pub polygon_geo: Polygon<f64>,
    /// Area in square meters, within the family's admissible range.
    pub area_m2: f64,
    /// Centroid in the projected metric frame.
    pub centroid_m: Point<f64>,
    /// Centroid in geographic coordinates.
    pub centroid_geo: Point<f64>,

    // Accessibility enrichment.
    /// Distance to the nearest road node in meters. `f64::INFINITY` when
    /// the road graph is empty.
    pub dist_to_road: f64,
    /// Classification of an edge adjacent to the nearest road node.
    pub nearest_road_class: RoadClass,

    /// Straight-line distance to the target in meters.
    pub dist_to_target: f64,

    // Visibility enrichment.
    /// Whether the sight segment to the nearest road node crosses building
    /// interior. Boundary-only touching counts as exposed.
    pub is_hidden: bool,

    // Security enrichment.
    /// Distance to the nearest security asset, or
    /// [`SECURITY_SENTINEL_M`] when none exists.
    pub nearest_security_dist: f64,

    // Elevation enrichment.
    /// Elevation in meters (0.0 fallback when the service is unreachable).
    pub elevation: f64,

    // Family-specific attributes.
    /// `natural` tag, Vegetation candidates only.
    pub natural_tag: Option<String>,
    /// `landuse` tag, Vegetation candidates only.
    pub landuse_tag: Option<String>,
    /// Building classification, Rooftop candidates only.
    pub building_type: Option<String>,
    /// Office classification, Rooftop candidates only.
    pub office_type: Option<String>,
    /// Floor count, Rooftop candidates only.
    pub level_count: Option<u32>,

    // Scoring output.
    /// The seven normalized factor scores, populated by the scoring
    /// engine.
    pub factors: Option<FactorScores>,
    /// Final threat score, clamped to [0, 100].
    pub threat_score: f64,
}

impl Candidate {
    /// Creates a freshly generated candidate with enrichment fields at
    /// their documented pre-enrichment defaults.
    #[must_use]
    pub fn new(
        id: u64,
        kind: CandidateKind,
        polygon_m: Polygon<f64>,
        polygon_geo: Polygon<f64>,
        area_m2: f64,
        centroid_m: Point<f64>,
        centroid_geo: Point<f64>,
        dist_to_target: f64,
    ) -> Self {
        Self {
            id,
            kind,
            polygon_m,
            polygon_geo,
            area_m2,
            centroid_m,
            centroid_geo,
            dist_to_road: f64::INFINITY,
            nearest_road_class: RoadClass::Unknown,
            dist_to_target,
            is_hidden: false,
            nearest_security_dist: SECURITY_SENTINEL_M,
            elevation: 0.0,
            natural_tag: None,
            landuse_tag: None,
            building_type: None,
            office_type: None,
            level_count: None,
            factors: None,
            threat_score: 0.0,
        }
    }

    /// Estimated flight time to the target in seconds at the given drone
    /// speed.
    #[must_use]
    pub fn est_flight_time(&self, drone_speed_mps: f64) -> f64 {
        self.dist_to_target / drone_speed_mps
    }

    /// Security-proximity zone of this candidate for the given thresholds.
    #[must_use]
    pub fn security_zone(&self, near_m: f64, monitored_m: f64) -> SecurityZone {
        SecurityZone::classify(self.nearest_security_dist, near_m, monitored_m)
    }
}
