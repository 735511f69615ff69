//! Morphological corridor detection.
//!
//! Concealed corridors are the parts of the open space between buildings
//! that vanish under erosion: shrink the open space inward by the erosion
//! offset (passages narrower than twice the offset disappear), dilate the
//! survivor back outward by a slightly larger offset, and subtract the
//! reconstruction from the original open space. What remains are the
//! narrow passages, minus slivers hugging building walls.
//!
//! The dilation offset is deliberately a little larger than the erosion
//! offset so floating-point reconstruction artifacts along the survivor
//! boundary cancel out instead of surfacing as hairline corridors.

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Polygon, unary_union};
use geo_buffer::buffer_multi_polygon;

/// Area below which a boolean-op residue is treated as empty.
const RESIDUE_AREA_M2: f64 = 1e-6;

/// Offsets driving the erosion/dilation pass.
#[derive(Debug, Clone, Copy)]
pub struct MorphologyParams {
    /// Inward offset in meters; passages narrower than `2 * erosion_m`
    /// vanish.
    pub erosion_m: f64,
    /// Outward reconstruction offset, slightly larger than `erosion_m`.
    pub dilation_m: f64,
    /// Corridors lying entirely within this distance of the building mass
    /// are discarded as edge artifacts.
    pub sliver_tolerance_m: f64,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            erosion_m: 2.0,
            dilation_m: 2.1,
            sliver_tolerance_m: 1.0,
        }
    }
}

/// Unions all building footprints into a single mass.
#[must_use]
pub fn building_union(footprints: &[Polygon<f64>]) -> MultiPolygon<f64> {
    unary_union(footprints.iter())
}

/// The analysis rectangle: the bounding rectangle of the building mass.
///
/// Returns `None` when the mass is empty or degenerate.
#[must_use]
pub fn study_area(mass: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    mass.bounding_rect().map(|rect| rect.to_polygon())
}

/// Runs the erosion/dilation pass and returns the corridor polygons,
/// decomposed into simple polygons with slivers removed.
///
/// Area filtering is the caller's concern; this function is purely the
/// morphology.
#[must_use]
pub fn extract_corridors(
    mass: &MultiPolygon<f64>,
    area: &Polygon<f64>,
    params: &MorphologyParams,
) -> Vec<Polygon<f64>> {
    let open_space = area.difference(mass);
    if open_space.0.is_empty() {
        return Vec::new();
    }

    let eroded = offset(&open_space, -params.erosion_m);
    let reconstructed = offset(&eroded, params.dilation_m);
    let corridors = open_space.difference(&reconstructed);

    let dilated_mass = offset(mass, params.sliver_tolerance_m);

    let kept: Vec<Polygon<f64>> = corridors
        .0
        .into_iter()
        .filter(|p| p.unsigned_area() > RESIDUE_AREA_M2)
        .filter(|p| !hugs_building_mass(p, &dilated_mass))
        .collect();

    log::debug!(
        "morphology: {} open-space polygons -> {} corridor polygons",
        open_space.0.len(),
        kept.len()
    );

    kept
}

/// Signed offset with an empty-input guard.
fn offset(mp: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if mp.0.is_empty() {
        return MultiPolygon(Vec::new());
    }
    buffer_multi_polygon(mp, distance)
}

/// A corridor is a sliver when subtracting the dilated building mass
/// leaves nothing: every point of it lies within the sliver tolerance of
/// a building boundary.
fn hugs_building_mass(polygon: &Polygon<f64>, dilated_mass: &MultiPolygon<f64>) -> bool {
    polygon.difference(dilated_mass).unsigned_area() < RESIDUE_AREA_M2
}
