//! Read-only input layers, as delivered by the data-retrieval
//! collaborator.
//!
//! All layer geometry is geographic (lon/lat, WGS84). The engine projects
//! into a locally-accurate metric frame before any distance or area
//! computation.

use geo::{Point, Polygon};

use crate::SecurityCategory;

/// A building footprint polygon with its optional classification
/// attributes.
#[derive(Debug, Clone)]
pub struct BuildingFootprint {
    pub polygon: Polygon<f64>,
    /// `building` tag (e.g. "residential", "commercial").
    pub building_type: Option<String>,
    /// `office` tag, when present.
    pub office_type: Option<String>,
    /// `building:levels` floor count, when present.
    pub levels: Option<u32>,
}

/// A natural or land-use polygon from the surface layer.
#[derive(Debug, Clone)]
pub struct SurfacePolygon {
    pub polygon: Polygon<f64>,
    /// `natural` tag (water, wood, sand, scrub, ...).
    pub natural_tag: Option<String>,
    /// `landuse` tag (forest, grass, basin, brownfield, ...).
    pub landuse_tag: Option<String>,
}

/// A road-graph node.
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub id: u64,
    /// Geographic position (lon/lat).
    pub position: Point<f64>,
}

/// A road-graph edge between two node ids.
#[derive(Debug, Clone)]
pub struct RoadEdge {
    pub from: u64,
    pub to: u64,
    /// `highway` classification tag.
    pub highway: String,
}

/// The road network around the target.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    pub nodes: Vec<RoadNode>,
    pub edges: Vec<RoadEdge>,
}

impl RoadGraph {
    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A security asset point (police station, checkpoint, camera, ...).
#[derive(Debug, Clone)]
pub struct SecurityAsset {
    /// Geographic position (lon/lat).
    pub position: Point<f64>,
    pub category: SecurityCategory,
}

/// The full set of input layers for one analysis request.
#[derive(Debug, Clone, Default)]
pub struct LayerBundle {
    pub buildings: Vec<BuildingFootprint>,
    pub surfaces: Vec<SurfacePolygon>,
    pub roads: RoadGraph,
    pub security: Vec<SecurityAsset>,
}
