#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Planar geometry for the launch-map engine.
//!
//! Two concerns live here: the [`LocalProjector`] that maps geographic
//! coordinates into a locally-accurate metric frame centered on the
//! analysis target, and the morphological machinery that surfaces
//! concealed corridors from the building mass (erosion-then-dilation of
//! the open space between footprints).

pub mod morphology;
pub mod projector;

pub use morphology::{MorphologyParams, building_union, extract_corridors, study_area};
pub use projector::LocalProjector;

use geo::{Area, Point, Polygon, Validation};

/// Euclidean distance between two points in the projected metric frame.
#[must_use]
pub fn planar_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    dx.hypot(dy)
}

/// Returns `true` if a source polygon is usable: valid (no
/// self-intersections, properly closed rings) and of non-zero area.
///
/// Malformed source polygons are skipped and counted by the caller, never
/// fatal.
#[must_use]
pub fn is_usable_polygon(polygon: &Polygon<f64>) -> bool {
    polygon.unsigned_area() > 0.0 && polygon.is_valid()
}
