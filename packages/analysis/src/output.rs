//! Output feature collection and response envelope.
//!
//! Field names and ranges match the wire contract exactly: downstream map
//! rendering and CSV export consume these properties without translation.
//! Candidate geometry is serialized in geographic coordinates; security
//! assets ride along as point features for display.

use geojson::{Feature, Geometry, JsonObject, JsonValue};
use launch_map_models::{AnalysisStats, Candidate, SecurityAsset, ThreatBand};
use serde::Serialize;
use serde_json::json;

use crate::AnalysisOutcome;
use crate::config::AnalysisConfig;

/// The response envelope returned by the API and written by the CLI.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub status: String,
    pub stats: AnalysisStats,
    pub features: Vec<Feature>,
}

/// Builds the response envelope for a completed analysis.
#[must_use]
pub fn build_response(
    outcome: &AnalysisOutcome,
    security: &[SecurityAsset],
    config: &AnalysisConfig,
) -> AnalysisResponse {
    let mut features: Vec<Feature> = outcome
        .candidates
        .iter()
        .map(|candidate| candidate_feature(candidate, config))
        .collect();
    features.extend(security.iter().map(security_feature));

    AnalysisResponse {
        status: "success".to_string(),
        stats: outcome.stats.clone(),
        features,
    }
}

/// One candidate as a `GeoJSON` feature carrying every candidate
/// attribute.
fn candidate_feature(candidate: &Candidate, config: &AnalysisConfig) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(candidate.id));
    properties.insert("type".to_string(), json!(candidate.kind.to_string()));
    properties.insert("threat_score".to_string(), json!(candidate.threat_score));
    properties.insert(
        "threat_band".to_string(),
        json!(ThreatBand::from_score(candidate.threat_score).to_string()),
    );
    properties.insert("is_hidden".to_string(), json!(candidate.is_hidden));
    // Infinite distances (empty road graph) have no JSON number; they
    // serialize as null.
    properties.insert("dist_to_road".to_string(), finite_or_null(candidate.dist_to_road));
    properties.insert("dist_to_center".to_string(), finite_or_null(candidate.dist_to_target));
    properties.insert(
        "nearest_security_dist".to_string(),
        json!(candidate.nearest_security_dist),
    );
    properties.insert(
        "est_flight_time".to_string(),
        finite_or_null(candidate.est_flight_time(config.drone_speed_mps)),
    );
    properties.insert("area".to_string(), json!(candidate.area_m2));
    properties.insert("elevation".to_string(), json!(candidate.elevation));
    properties.insert(
        "nearest_road_type".to_string(),
        json!(candidate.nearest_road_class.to_string()),
    );
    properties.insert(
        "security_zone".to_string(),
        json!(
            candidate
                .security_zone(config.security_zones.near_m, config.security_zones.monitored_m)
                .to_string()
        ),
    );
    if let Some(factors) = &candidate.factors {
        properties.insert(
            "factor_scores".to_string(),
            serde_json::to_value(factors).unwrap_or(JsonValue::Null),
        );
    }
    if let Some(tag) = &candidate.natural_tag {
        properties.insert("natural".to_string(), json!(tag));
    }
    if let Some(tag) = &candidate.landuse_tag {
        properties.insert("landuse".to_string(), json!(tag));
    }
    if let Some(tag) = &candidate.building_type {
        properties.insert("building_type".to_string(), json!(tag));
    }
    if let Some(tag) = &candidate.office_type {
        properties.insert("office_type".to_string(), json!(tag));
    }
    if let Some(levels) = candidate.level_count {
        properties.insert("levels".to_string(), json!(levels));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&candidate.polygon_geo))),
        id: Some(geojson::feature::Id::Number(candidate.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// One security asset as a display point feature.
fn security_feature(asset: &SecurityAsset) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("type".to_string(), json!("SecurityAsset"));
    properties.insert("category".to_string(), json!(asset.category.to_string()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&asset.position))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn finite_or_null(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
}

#[cfg(test)]
mod tests {
    use geo::{Point, polygon};
    use launch_map_models::{CandidateKind, FactorScores, SecurityCategory, Target};

    use super::*;

    fn outcome_with_one_candidate() -> AnalysisOutcome {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.001, y: 0.0),
            (x: 0.001, y: 0.001),
            (x: 0.0, y: 0.001),
        ];
        let mut candidate = Candidate::new(
            3,
            CandidateKind::Alley,
            square.clone(),
            square,
            60.0,
            Point::new(5.0, 5.0),
            Point::new(0.0005, 0.0005),
            450.0,
        );
        candidate.threat_score = 84.5;
        candidate.is_hidden = true;
        candidate.dist_to_road = 12.0;
        candidate.factors = Some(FactorScores {
            dist_to_target: 5,
            building_structure: 3,
            road_class: 5,
            elevation_profile: 3,
            land_cover: 5,
            visual_exposure: 5,
            terrain: 2,
        });
        AnalysisOutcome {
            target: Target {
                geographic: Point::new(0.0, 0.0),
                projected: Point::new(0.0, 0.0),
                elevation: 0.0,
            },
            candidates: vec![candidate],
            stats: AnalysisStats::default(),
        }
    }

    #[test]
    fn candidate_feature_carries_wire_properties() {
        let config = AnalysisConfig::default();
        let outcome = outcome_with_one_candidate();
        let response = build_response(&outcome, &[], &config);
        assert_eq!(response.status, "success");
        assert_eq!(response.features.len(), 1);

        let props = response.features[0].properties.as_ref().unwrap();
        assert_eq!(props["type"], json!("Alley"));
        assert_eq!(props["threat_score"], json!(84.5));
        assert_eq!(props["threat_band"], json!("Critical"));
        assert_eq!(props["is_hidden"], json!(true));
        assert_eq!(props["dist_to_road"], json!(12.0));
        assert_eq!(props["dist_to_center"], json!(450.0));
        assert_eq!(props["est_flight_time"], json!(30.0));
        assert_eq!(props["area"], json!(60.0));
        assert_eq!(props["factor_scores"]["visual_exposure"], json!(5));
    }

    #[test]
    fn infinite_road_distance_serializes_as_null() {
        let config = AnalysisConfig::default();
        let mut outcome = outcome_with_one_candidate();
        outcome.candidates[0].dist_to_road = f64::INFINITY;
        let response = build_response(&outcome, &[], &config);
        let props = response.features[0].properties.as_ref().unwrap();
        assert_eq!(props["dist_to_road"], JsonValue::Null);
    }

    #[test]
    fn security_assets_ride_along_as_point_features() {
        let config = AnalysisConfig::default();
        let outcome = outcome_with_one_candidate();
        let assets = vec![SecurityAsset {
            position: Point::new(0.002, 0.002),
            category: SecurityCategory::Police,
        }];
        let response = build_response(&outcome, &assets, &config);
        assert_eq!(response.features.len(), 2);
        let props = response.features[1].properties.as_ref().unwrap();
        assert_eq!(props["type"], json!("SecurityAsset"));
        assert_eq!(props["category"], json!("police"));
    }
}
