//! Analysis request document parsing.
//!
//! The request body carries the target point, the retrieval radius, and
//! the four input layers: buildings and surfaces as `GeoJSON`
//! `FeatureCollection`s, the road graph as plain node/edge records, and
//! security assets as a `FeatureCollection` of points (or footprints,
//! reduced to their centroids). Features whose geometry cannot be
//! interpreted are dropped here; geometric validity is screened later by
//! the generator, which also counts the skips.

use geo::{Centroid, Point, Polygon};
use geojson::FeatureCollection;
use launch_map_models::{
    BuildingFootprint, LayerBundle, RoadEdge, RoadGraph, RoadNode, SecurityAsset,
    SecurityCategory, SurfacePolygon,
};
use serde::Deserialize;

/// Property keys scanned, in order, for a security asset's category.
const SECURITY_TAG_KEYS: [&str; 5] = ["category", "amenity", "military", "man_made", "building"];

/// One analysis request, as posted to the API or read from disk.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub target: TargetPoint,
    /// Radius the layers were retrieved with, in meters.
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
    pub layers: RawLayers,
}

const fn default_radius_m() -> f64 {
    1000.0
}

/// The protected point.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TargetPoint {
    pub lat: f64,
    pub lon: f64,
}

/// The raw input layers, still in wire form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLayers {
    #[serde(default)]
    pub buildings: Option<FeatureCollection>,
    #[serde(default)]
    pub surfaces: Option<FeatureCollection>,
    #[serde(default)]
    pub roads: RawRoadGraph,
    #[serde(default)]
    pub security: Option<FeatureCollection>,
}

/// Road graph in wire form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoadGraph {
    #[serde(default)]
    pub nodes: Vec<RawRoadNode>,
    #[serde(default)]
    pub edges: Vec<RawRoadEdge>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawRoadNode {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRoadEdge {
    pub from: u64,
    pub to: u64,
    #[serde(default)]
    pub highway: Option<String>,
}

impl AnalysisRequest {
    /// The target as a lon/lat point.
    #[must_use]
    pub fn target_point(&self) -> Point<f64> {
        Point::new(self.target.lon, self.target.lat)
    }

    /// Converts the wire layers into the engine's layer bundle.
    #[must_use]
    pub fn layer_bundle(&self) -> LayerBundle {
        LayerBundle {
            buildings: parse_buildings(self.layers.buildings.as_ref()),
            surfaces: parse_surfaces(self.layers.surfaces.as_ref()),
            roads: parse_roads(&self.layers.roads),
            security: parse_security(self.layers.security.as_ref()),
        }
    }
}

fn parse_buildings(collection: Option<&FeatureCollection>) -> Vec<BuildingFootprint> {
    let Some(collection) = collection else {
        return Vec::new();
    };
    let mut buildings = Vec::new();
    for feature in &collection.features {
        // The `building` tag value "yes" marks presence without a
        // classification.
        let building_type =
            prop_string(feature, "building").filter(|value| value != "yes" && value != "true");
        let office_type = prop_string(feature, "office");
        let levels = prop_levels(feature);
        for polygon in feature_polygons(feature) {
            buildings.push(BuildingFootprint {
                polygon,
                building_type: building_type.clone(),
                office_type: office_type.clone(),
                levels,
            });
        }
    }
    buildings
}

fn parse_surfaces(collection: Option<&FeatureCollection>) -> Vec<SurfacePolygon> {
    let Some(collection) = collection else {
        return Vec::new();
    };
    let mut surfaces = Vec::new();
    for feature in &collection.features {
        let natural_tag = prop_string(feature, "natural");
        let landuse_tag = prop_string(feature, "landuse");
        for polygon in feature_polygons(feature) {
            surfaces.push(SurfacePolygon {
                polygon,
                natural_tag: natural_tag.clone(),
                landuse_tag: landuse_tag.clone(),
            });
        }
    }
    surfaces
}

fn parse_roads(raw: &RawRoadGraph) -> RoadGraph {
    RoadGraph {
        nodes: raw
            .nodes
            .iter()
            .map(|node| RoadNode {
                id: node.id,
                position: Point::new(node.lon, node.lat),
            })
            .collect(),
        edges: raw
            .edges
            .iter()
            .map(|edge| RoadEdge {
                from: edge.from,
                to: edge.to,
                highway: edge.highway.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

fn parse_security(collection: Option<&FeatureCollection>) -> Vec<SecurityAsset> {
    let Some(collection) = collection else {
        return Vec::new();
    };
    collection
        .features
        .iter()
        .filter_map(|feature| {
            let position = feature_point(feature)?;
            let category = SECURITY_TAG_KEYS
                .iter()
                .find_map(|key| prop_string(feature, key))
                .map_or(SecurityCategory::Other, |tag| {
                    SecurityCategory::from_tag(&tag)
                });
            Some(SecurityAsset { position, category })
        })
        .collect()
}

/// Extracts the polygons of a feature; multi-polygons explode into their
/// parts.
fn feature_polygons(feature: &geojson::Feature) -> Vec<Polygon<f64>> {
    let Some(geometry) = &feature.geometry else {
        return Vec::new();
    };
    match geo::Geometry::<f64>::try_from(geometry.clone()) {
        Ok(geo::Geometry::Polygon(polygon)) => vec![polygon],
        Ok(geo::Geometry::MultiPolygon(multi)) => multi.0,
        _ => Vec::new(),
    }
}

/// Extracts a representative point: the point itself, or a footprint's
/// centroid.
fn feature_point(feature: &geojson::Feature) -> Option<Point<f64>> {
    let geometry = feature.geometry.as_ref()?;
    match geo::Geometry::<f64>::try_from(geometry.clone()).ok()? {
        geo::Geometry::Point(point) => Some(point),
        geo::Geometry::Polygon(polygon) => polygon.centroid(),
        geo::Geometry::MultiPolygon(multi) => multi.centroid(),
        _ => None,
    }
}

fn prop_string(feature: &geojson::Feature, key: &str) -> Option<String> {
    feature
        .properties
        .as_ref()?
        .get(key)?
        .as_str()
        .map(String::from)
}

/// `building:levels` arrives as either a number or a string in source
/// data.
fn prop_levels(feature: &geojson::Feature) -> Option<u32> {
    let properties = feature.properties.as_ref()?;
    let value = properties
        .get("building:levels")
        .or_else(|| properties.get("levels"))?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value.as_str()?.trim().parse().ok()
}
