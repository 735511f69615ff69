//! Nearest-road queries over the road graph.
//!
//! Road nodes are projected into the metric frame and bulk-loaded into an
//! R-tree, so each query is sub-linear rather than a scan over the whole
//! graph. Each node also carries the classification of one incident edge
//! (first in input order, which keeps repeated runs deterministic).

use std::collections::HashMap;

use geo::Point;
use launch_map_geometry::LocalProjector;
use launch_map_models::{RoadClass, RoadGraph};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A road node stored in the R-tree.
struct NodeEntry {
    position: [f64; 2],
    node_id: u64,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Result of a nearest-road query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestRoad {
    pub node_id: u64,
    /// Node position in the projected metric frame.
    pub position: Point<f64>,
    /// Euclidean distance from the query point in meters.
    pub distance: f64,
    /// Classification of an edge incident to the node.
    pub class: RoadClass,
}

/// Nearest-point query structure over road-graph nodes.
pub struct RoadIndex {
    tree: RTree<NodeEntry>,
    class_by_node: HashMap<u64, RoadClass>,
}

impl RoadIndex {
    /// Projects the graph's nodes into the metric frame and builds the
    /// index. An empty graph builds an empty index; queries then return
    /// `None` and the caller degrades to infinite distance.
    #[must_use]
    pub fn build(graph: &RoadGraph, projector: &LocalProjector) -> Self {
        let entries: Vec<NodeEntry> = graph
            .nodes
            .iter()
            .map(|node| {
                let p = projector.project(node.position);
                NodeEntry {
                    position: [p.x(), p.y()],
                    node_id: node.id,
                }
            })
            .collect();

        let mut class_by_node: HashMap<u64, RoadClass> = HashMap::new();
        for edge in &graph.edges {
            let class = RoadClass::from_highway_tag(&edge.highway);
            class_by_node.entry(edge.from).or_insert(class);
            class_by_node.entry(edge.to).or_insert(class);
        }

        log::debug!("road index: {} nodes, {} edges", entries.len(), graph.edges.len());

        Self {
            tree: RTree::bulk_load(entries),
            class_by_node,
        }
    }

    /// Returns the nearest road node to a projected point, or `None` when
    /// the road graph is empty.
    #[must_use]
    pub fn nearest(&self, point: Point<f64>) -> Option<NearestRoad> {
        let query = [point.x(), point.y()];
        self.tree.nearest_neighbor(&query).map(|entry| {
            let position = Point::new(entry.position[0], entry.position[1]);
            NearestRoad {
                node_id: entry.node_id,
                position,
                distance: entry.distance_2(&query).sqrt(),
                class: self
                    .class_by_node
                    .get(&entry.node_id)
                    .copied()
                    .unwrap_or(RoadClass::Unknown),
            }
        })
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` when no nodes are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
