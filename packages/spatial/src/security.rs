//! Nearest security-asset queries.

use geo::Point;
use launch_map_geometry::LocalProjector;
use launch_map_models::{SecurityAsset, SecurityCategory};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

struct AssetEntry {
    position: [f64; 2],
    category: SecurityCategory,
}

impl RTreeObject for AssetEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for AssetEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Result of a nearest-asset query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestAsset {
    /// Euclidean distance from the query point in meters.
    pub distance: f64,
    pub category: SecurityCategory,
}

/// Nearest-neighbor index over security-asset points in the projected
/// frame.
pub struct SecurityIndex {
    tree: RTree<AssetEntry>,
}

impl SecurityIndex {
    /// Projects the asset points and builds the index. An empty asset set
    /// builds an empty index; callers substitute the sentinel distance.
    #[must_use]
    pub fn build(assets: &[SecurityAsset], projector: &LocalProjector) -> Self {
        let entries: Vec<AssetEntry> = assets
            .iter()
            .map(|asset| {
                let p = projector.project(asset.position);
                AssetEntry {
                    position: [p.x(), p.y()],
                    category: asset.category,
                }
            })
            .collect();

        log::debug!("security index: {} assets", entries.len());

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Returns the nearest security asset to a projected point, or `None`
    /// when no assets exist.
    #[must_use]
    pub fn nearest(&self, point: Point<f64>) -> Option<NearestAsset> {
        let query = [point.x(), point.y()];
        self.tree.nearest_neighbor(&query).map(|entry| NearestAsset {
            distance: entry.distance_2(&query).sqrt(),
            category: entry.category,
        })
    }

    /// Returns `true` when no assets are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> LocalProjector {
        LocalProjector::new(Point::new(0.0, 0.0))
    }

    #[test]
    fn nearest_asset_distance_and_category() {
        let assets = vec![
            SecurityAsset {
                position: Point::new(0.001, 0.0),
                category: SecurityCategory::Police,
            },
            SecurityAsset {
                position: Point::new(0.01, 0.0),
                category: SecurityCategory::Military,
            },
        ];
        let index = SecurityIndex::build(&assets, &projector());
        let hit = index.nearest(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(hit.category, SecurityCategory::Police);
        assert!((hit.distance - 111.3).abs() < 1.0, "got {}", hit.distance);
    }

    #[test]
    fn empty_set_returns_none() {
        let index = SecurityIndex::build(&[], &projector());
        assert!(index.is_empty());
        assert!(index.nearest(Point::new(0.0, 0.0)).is_none());
    }
}
