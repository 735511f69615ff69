//! AHP threat scoring.
//!
//! Seven factors, each normalized independently to an integer score in
//! 1–5, combined as `min(100, Σ factor × 20 × weight)`. The ×20 rescales
//! the 1–5 ordinal onto a 0–100-comparable contribution before weighting.
//! Every lookup has an explicit default for candidates lacking the
//! relevant attribute (a corridor never carries a building
//! classification, a rooftop never carries a surface tag) so no factor
//! ever null-propagates into the sum. The result is deterministic given
//! the seven inputs: no randomness, no order dependence.

use launch_map_models::{Candidate, CandidateKind, FactorScores, RoadClass};

use crate::config::FactorWeights;

/// Rescale applied to each 1–5 ordinal before weighting.
const ORDINAL_SCALE: f64 = 20.0;

/// Scores a fully enriched candidate. Returns the recorded factor values
/// and the clamped threat score.
#[must_use]
pub fn score_candidate(
    candidate: &Candidate,
    target_elevation: f64,
    weights: &FactorWeights,
) -> (FactorScores, f64) {
    let factors = FactorScores {
        dist_to_target: distance_factor(candidate.dist_to_target),
        building_structure: structure_factor(candidate.kind, candidate.building_type.as_deref()),
        road_class: road_factor(candidate.nearest_road_class),
        elevation_profile: elevation_factor(candidate.elevation, target_elevation),
        land_cover: land_cover_factor(
            candidate.kind,
            candidate.landuse_tag.as_deref(),
            candidate.natural_tag.as_deref(),
        ),
        visual_exposure: exposure_factor(candidate.is_hidden),
        terrain: terrain_factor(candidate.natural_tag.as_deref()),
    };
    (factors, weighted_score(&factors, weights))
}

/// Combines recorded factor values into the final threat score, clamped
/// to [0, 100] and rounded to two decimals.
#[must_use]
pub fn weighted_score(factors: &FactorScores, weights: &FactorWeights) -> f64 {
    let sum = f64::from(factors.dist_to_target) * ORDINAL_SCALE * weights.dist_to_target
        + f64::from(factors.building_structure) * ORDINAL_SCALE * weights.building_structure
        + f64::from(factors.road_class) * ORDINAL_SCALE * weights.road_class
        + f64::from(factors.elevation_profile) * ORDINAL_SCALE * weights.elevation_profile
        + f64::from(factors.land_cover) * ORDINAL_SCALE * weights.land_cover
        + f64::from(factors.visual_exposure) * ORDINAL_SCALE * weights.visual_exposure
        + f64::from(factors.terrain) * ORDINAL_SCALE * weights.terrain;
    (sum.min(100.0) * 100.0).round() / 100.0
}

/// Distance to target: < 500 m scores 5, > 5000 m scores 1, linear in
/// between.
fn distance_factor(dist_to_target_m: f64) -> u8 {
    if dist_to_target_m < 500.0 {
        5
    } else if dist_to_target_m > 5000.0 {
        1
    } else {
        let t = (dist_to_target_m - 500.0) / 4500.0;
        let raw = (4.0f64.mul_add(-t, 5.0)).round();
        raw.clamp(1.0, 5.0) as u8
    }
}

/// Building structure, rooftop candidates only: residential roofs are the
/// most usable, commercial the least. Non-rooftop candidates take the
/// neutral default.
fn structure_factor(kind: CandidateKind, building_type: Option<&str>) -> u8 {
    if kind != CandidateKind::Building {
        return 3;
    }
    match building_type {
        Some(
            "residential" | "house" | "apartments" | "detached" | "semidetached_house"
            | "terrace" | "dormitory",
        ) => 5,
        Some("commercial" | "retail" | "office" | "industrial" | "warehouse" | "supermarket") => 2,
        // government/public/civic, plus anything unrecognized or untagged.
        _ => 3,
    }
}

/// Road classification: unpaved/minor roads score 5 down to expressways
/// at 1. An unknown class (empty road graph, unrecognized tag) floors to
/// the lowest tier.
fn road_factor(class: RoadClass) -> u8 {
    match class {
        RoadClass::Track | RoadClass::Path | RoadClass::Service | RoadClass::Unclassified => 5,
        RoadClass::Residential | RoadClass::LivingStreet => 4,
        RoadClass::Tertiary => 3,
        RoadClass::Secondary | RoadClass::Primary => 2,
        RoadClass::Trunk | RoadClass::Motorway | RoadClass::Unknown => 1,
    }
}

/// Elevation profile relative to the target: more than 10 m above scores
/// 5, within ±10 m scores 3, more than 10 m below scores 2.
fn elevation_factor(candidate_elevation: f64, target_elevation: f64) -> u8 {
    let diff = candidate_elevation - target_elevation;
    if diff > 10.0 {
        5
    } else if diff >= -10.0 {
        3
    } else {
        2
    }
}

/// Land cover: barren ground and corridors score 5, grass and fallow 3,
/// agriculture 2. Corridors and rooftops fix at 5 (bare built surfaces),
/// vegetation resolves its landuse tag first, then its natural tag.
fn land_cover_factor(
    kind: CandidateKind,
    landuse_tag: Option<&str>,
    natural_tag: Option<&str>,
) -> u8 {
    match kind {
        CandidateKind::Alley | CandidateKind::Building => 5,
        CandidateKind::Vegetation => landuse_tag
            .and_then(surface_cover_score)
            .or_else(|| natural_tag.and_then(surface_cover_score))
            .unwrap_or(3),
    }
}

/// Known surface tags for the land-cover factor.
fn surface_cover_score(tag: &str) -> Option<u8> {
    match tag {
        "sand" | "earth" | "scrub" | "bare_rock" | "scree" | "construction" | "brownfield"
        | "landfill" => Some(5),
        "grass" | "grassland" | "meadow" | "fallow" | "greenfield" | "heath"
        | "recreation_ground" => Some(3),
        "farmland" | "farmyard" | "orchard" | "vineyard" | "allotments" => Some(2),
        _ => None,
    }
}

/// Visual exposure: hidden from the road scores 5, exposed scores 1.
fn exposure_factor(is_hidden: bool) -> u8 {
    if is_hidden { 5 } else { 1 }
}

/// Terrain type by natural tag: hills and peaks score 5, water and
/// wetland 4, everything else (including untagged candidates) is treated
/// as plains at 2.
fn terrain_factor(natural_tag: Option<&str>) -> u8 {
    match natural_tag {
        Some("hill" | "peak" | "ridge" | "cliff" | "dune") => 5,
        Some("water" | "wetland" | "marsh" | "bay") => 4,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use geo::{Point, polygon};
    use launch_map_models::Candidate;

    use super::*;

    fn candidate(kind: CandidateKind) -> Candidate {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        Candidate::new(
            0,
            kind,
            square.clone(),
            square,
            100.0,
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            300.0,
        )
    }

    #[test]
    fn distance_factor_piecewise_rule() {
        assert_eq!(distance_factor(0.0), 5);
        assert_eq!(distance_factor(499.9), 5);
        assert_eq!(distance_factor(500.0), 5);
        assert_eq!(distance_factor(2750.0), 3);
        assert_eq!(distance_factor(5000.0), 1);
        assert_eq!(distance_factor(12_000.0), 1);
    }

    #[test]
    fn structure_factor_lookup() {
        assert_eq!(structure_factor(CandidateKind::Building, Some("residential")), 5);
        assert_eq!(structure_factor(CandidateKind::Building, Some("government")), 3);
        assert_eq!(structure_factor(CandidateKind::Building, Some("commercial")), 2);
        assert_eq!(structure_factor(CandidateKind::Building, None), 3);
        // Non-rooftop families take the neutral default regardless of tag.
        assert_eq!(structure_factor(CandidateKind::Alley, None), 3);
        assert_eq!(structure_factor(CandidateKind::Vegetation, None), 3);
    }

    #[test]
    fn road_factor_lookup() {
        assert_eq!(road_factor(RoadClass::Track), 5);
        assert_eq!(road_factor(RoadClass::Residential), 4);
        assert_eq!(road_factor(RoadClass::Tertiary), 3);
        assert_eq!(road_factor(RoadClass::Primary), 2);
        assert_eq!(road_factor(RoadClass::Motorway), 1);
        assert_eq!(road_factor(RoadClass::Unknown), 1);
    }

    #[test]
    fn elevation_factor_bands() {
        assert_eq!(elevation_factor(215.0, 200.0), 5);
        assert_eq!(elevation_factor(205.0, 200.0), 3);
        assert_eq!(elevation_factor(195.0, 200.0), 3);
        assert_eq!(elevation_factor(185.0, 200.0), 2);
    }

    #[test]
    fn land_cover_defaults_per_family() {
        assert_eq!(land_cover_factor(CandidateKind::Alley, None, None), 5);
        assert_eq!(land_cover_factor(CandidateKind::Building, None, None), 5);
        assert_eq!(land_cover_factor(CandidateKind::Vegetation, Some("brownfield"), None), 5);
        assert_eq!(land_cover_factor(CandidateKind::Vegetation, Some("grass"), None), 3);
        assert_eq!(land_cover_factor(CandidateKind::Vegetation, Some("farmland"), None), 2);
        assert_eq!(land_cover_factor(CandidateKind::Vegetation, None, Some("scrub")), 5);
        assert_eq!(land_cover_factor(CandidateKind::Vegetation, None, Some("wood")), 3);
    }

    #[test]
    fn terrain_factor_lookup() {
        assert_eq!(terrain_factor(Some("peak")), 5);
        assert_eq!(terrain_factor(Some("water")), 4);
        assert_eq!(terrain_factor(Some("wood")), 2);
        assert_eq!(terrain_factor(None), 2);
    }

    #[test]
    fn residential_rooftop_scenario_clamps_to_critical() {
        // Residential rooftop, 300 m out, hidden, 15 m above the target,
        // unpaved access, barren surroundings: factors {5,5,5,5,5,5,2},
        // weighted sum over 100, clamped.
        let mut c = candidate(CandidateKind::Building);
        c.building_type = Some("residential".to_string());
        c.dist_to_target = 300.0;
        c.is_hidden = true;
        c.elevation = 215.0;
        c.nearest_road_class = RoadClass::Track;
        c.kind = CandidateKind::Building;

        let (factors, score) = score_candidate(&c, 200.0, &FactorWeights::default());
        assert_eq!(factors.dist_to_target, 5);
        assert_eq!(factors.building_structure, 5);
        assert_eq!(factors.road_class, 5);
        assert_eq!(factors.elevation_profile, 5);
        assert_eq!(factors.land_cover, 5);
        assert_eq!(factors.visual_exposure, 5);
        assert_eq!(factors.terrain, 2);
        assert!((score - 100.0).abs() < f64::EPSILON, "got {score}");
        assert_eq!(
            launch_map_models::ThreatBand::from_score(score),
            launch_map_models::ThreatBand::Critical
        );
    }

    #[test]
    fn score_stays_in_range_for_all_factor_extremes() {
        let weights = FactorWeights::default();
        let low = FactorScores {
            dist_to_target: 1,
            building_structure: 1,
            road_class: 1,
            elevation_profile: 1,
            land_cover: 1,
            visual_exposure: 1,
            terrain: 1,
        };
        let high = FactorScores {
            dist_to_target: 5,
            building_structure: 5,
            road_class: 5,
            elevation_profile: 5,
            land_cover: 5,
            visual_exposure: 5,
            terrain: 5,
        };
        let low_score = weighted_score(&low, &weights);
        let high_score = weighted_score(&high, &weights);
        assert!(low_score > 0.0 && low_score < high_score);
        assert!((high_score - 100.0).abs() < f64::EPSILON, "ceiling must clamp");
    }

    #[test]
    fn scoring_is_deterministic() {
        let mut c = candidate(CandidateKind::Vegetation);
        c.natural_tag = Some("water".to_string());
        c.is_hidden = true;
        let a = score_candidate(&c, 0.0, &FactorWeights::default());
        let b = score_candidate(&c, 0.0, &FactorWeights::default());
        assert_eq!(a.0, b.0);
        assert!((a.1 - b.1).abs() < f64::EPSILON);
    }
}
