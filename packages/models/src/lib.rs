#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core data model for the launch-map analysis engine.
//!
//! This crate defines the candidate work item, the read-only input layer
//! types, and the taxonomy enums (candidate family, road classification,
//! security category, threat band) shared across the entire launch-map
//! system. All downstream crates normalize their source-specific tags into
//! this shared taxonomy.

pub mod candidate;
pub mod layers;
pub mod stats;

pub use candidate::{Candidate, FactorScores, Target};
pub use layers::{
    BuildingFootprint, LayerBundle, RoadEdge, RoadGraph, RoadNode, SecurityAsset, SurfacePolygon,
};
pub use stats::AnalysisStats;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Distance (meters) reported for `nearest_security_dist` when no security
/// asset exists within the analysis scope.
pub const SECURITY_SENTINEL_M: f64 = 9999.0;

/// Candidate family. Each candidate belongs to exactly one family.
///
/// The variant names are the wire names used in output feature properties
/// (`type` field), so downstream consumers need no translation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum CandidateKind {
    /// Narrow concealed corridor between buildings, surfaced by
    /// morphological erosion-then-dilation of the open space.
    Alley,
    /// Natural or land-use polygon taken directly from the surface layer.
    Vegetation,
    /// Usable rooftop derived from a building footprint.
    Building,
}

/// Road classification derived from the `highway` tag of the edge adjacent
/// to a candidate's nearest road node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Track,
    Path,
    /// Unrecognized tag, or no road graph at all. Scores as the lowest
    /// accessibility tier.
    Unknown,
}

impl RoadClass {
    /// Parses an OSM-style `highway` tag into a road class.
    ///
    /// Link variants (`primary_link` etc.) collapse into their parent
    /// class. Anything unrecognized maps to [`Self::Unknown`], never a
    /// silent fall-through to a mid-tier class.
    #[must_use]
    pub fn from_highway_tag(tag: &str) -> Self {
        let base = tag.strip_suffix("_link").unwrap_or(tag);
        base.parse().unwrap_or(Self::Unknown)
    }
}

/// Category of a security asset point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecurityCategory {
    Police,
    Fire,
    Government,
    Military,
    Embassy,
    Checkpoint,
    Surveillance,
    Other,
}

impl SecurityCategory {
    /// Parses a source tag into a category, defaulting to [`Self::Other`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "barracks" | "office" => Self::Military,
            t => t.parse().unwrap_or(Self::Other),
        }
    }
}

/// Threat band derived from the final 0–100 threat score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ThreatBand {
    /// Score above 80.
    Critical,
    /// Score above 50, up to 80.
    High,
    /// Score of 50 or below.
    Medium,
}

impl ThreatBand {
    /// Classifies a threat score into its band.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Self::Critical
        } else if score > 50.0 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// Security-proximity zone for a candidate. Feeds statistics only; zone
/// membership never enters the threat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SecurityZone {
    /// Within the near threshold (default 150 m) of a security asset.
    NearSecurity,
    /// Within the monitored threshold (default 300 m).
    Monitored,
    /// Beyond both thresholds, or no security asset in scope.
    Unmonitored,
}

impl SecurityZone {
    /// Classifies a nearest-security distance against the two zone
    /// thresholds.
    #[must_use]
    pub fn classify(nearest_security_dist: f64, near_m: f64, monitored_m: f64) -> Self {
        if nearest_security_dist < near_m {
            Self::NearSecurity
        } else if nearest_security_dist < monitored_m {
            Self::Monitored
        } else {
            Self::Unmonitored
        }
    }
}
