//! Candidate generation from the polygon layers.
//!
//! Three disjoint families come out of this pass: corridors (morphological
//! erosion/dilation of the open space between buildings), vegetation (one
//! candidate per surface polygon), and rooftops (building footprints
//! within the usable area range). Malformed source polygons are skipped
//! and counted, never fatal; empty layers simply contribute zero
//! candidates of their family.

use geo::{Area, Centroid, MultiPolygon, Point, Polygon};
use launch_map_geometry::{
    LocalProjector, building_union, extract_corridors, is_usable_polygon, planar_distance,
    study_area,
};
use launch_map_models::{Candidate, CandidateKind, LayerBundle};

use crate::config::AnalysisConfig;

/// Output of the generation pass.
pub struct GeneratedCandidates {
    /// Candidates in stable generation order: corridors, vegetation,
    /// rooftops.
    pub candidates: Vec<Candidate>,
    /// Union of all valid building footprints in the projected frame,
    /// reused by the visibility checker.
    pub buildings_union: MultiPolygon<f64>,
    /// Malformed source polygons skipped during generation.
    pub invalid_geometry_count: usize,
}

/// Runs candidate generation over the input layers.
#[must_use]
pub fn generate(
    layers: &LayerBundle,
    projector: &LocalProjector,
    target_m: Point<f64>,
    config: &AnalysisConfig,
) -> GeneratedCandidates {
    let mut invalid_geometry_count = 0usize;

    // Project and screen building footprints once; both the corridor
    // morphology and the rooftop family read from this set.
    let mut footprints: Vec<(Polygon<f64>, usize)> = Vec::with_capacity(layers.buildings.len());
    for (source_index, building) in layers.buildings.iter().enumerate() {
        let polygon_m = projector.project_polygon(&building.polygon);
        if is_usable_polygon(&polygon_m) {
            footprints.push((polygon_m, source_index));
        } else {
            invalid_geometry_count += 1;
        }
    }
    if invalid_geometry_count > 0 {
        log::warn!("skipped {invalid_geometry_count} malformed building footprints");
    }

    let buildings_union = building_union(
        &footprints
            .iter()
            .map(|(polygon, _)| polygon.clone())
            .collect::<Vec<_>>(),
    );

    let mut candidates = Vec::new();
    let mut next_id = 0u64;

    // Corridor family.
    if let Some(area) = study_area(&buildings_union) {
        for polygon_m in extract_corridors(&buildings_union, &area, &config.morphology) {
            let area_m2 = polygon_m.unsigned_area();
            if !config.corridor_area.contains(area_m2) {
                continue;
            }
            if let Some(candidate) = build_candidate(
                next_id,
                CandidateKind::Alley,
                polygon_m,
                area_m2,
                projector,
                target_m,
            ) {
                candidates.push(candidate);
                next_id += 1;
            }
        }
    }
    let alley_count = candidates.len();
    log::info!("corridor extraction: {alley_count} candidates");

    // Vegetation family: every surface polygon becomes a candidate
    // directly, tagged with its source category.
    for surface in &layers.surfaces {
        let polygon_m = projector.project_polygon(&surface.polygon);
        if !is_usable_polygon(&polygon_m) {
            invalid_geometry_count += 1;
            continue;
        }
        let area_m2 = polygon_m.unsigned_area();
        if let Some(mut candidate) = build_candidate(
            next_id,
            CandidateKind::Vegetation,
            polygon_m,
            area_m2,
            projector,
            target_m,
        ) {
            candidate.natural_tag = surface.natural_tag.clone();
            candidate.landuse_tag = surface.landuse_tag.clone();
            candidates.push(candidate);
            next_id += 1;
        }
    }
    log::info!("vegetation: {} candidates", candidates.len() - alley_count);

    // Rooftop family: footprints within the usable area range, carrying
    // the building's classification attributes.
    let before_rooftops = candidates.len();
    for (polygon_m, source_index) in footprints {
        let area_m2 = polygon_m.unsigned_area();
        if !config.rooftop_area.contains(area_m2) {
            continue;
        }
        if let Some(mut candidate) = build_candidate(
            next_id,
            CandidateKind::Building,
            polygon_m,
            area_m2,
            projector,
            target_m,
        ) {
            let source = &layers.buildings[source_index];
            candidate.building_type = source.building_type.clone();
            candidate.office_type = source.office_type.clone();
            candidate.level_count = source.levels;
            candidates.push(candidate);
            next_id += 1;
        }
    }
    log::info!("rooftops: {} candidates", candidates.len() - before_rooftops);

    GeneratedCandidates {
        candidates,
        buildings_union,
        invalid_geometry_count,
    }
}

/// Assembles a candidate from a projected polygon. Returns `None` for
/// polygons with no computable centroid (fully degenerate).
fn build_candidate(
    id: u64,
    kind: CandidateKind,
    polygon_m: Polygon<f64>,
    area_m2: f64,
    projector: &LocalProjector,
    target_m: Point<f64>,
) -> Option<Candidate> {
    let centroid_m = polygon_m.centroid()?;
    let polygon_geo = projector.unproject_polygon(&polygon_m);
    let centroid_geo = projector.unproject(centroid_m);
    let dist_to_target = planar_distance(centroid_m, target_m);
    Some(Candidate::new(
        id,
        kind,
        polygon_m,
        polygon_geo,
        area_m2,
        centroid_m,
        centroid_geo,
        dist_to_target,
    ))
}

#[cfg(test)]
mod tests {
    use geo::polygon;
    use launch_map_models::{BuildingFootprint, SurfacePolygon};

    use super::*;

    // Roughly 90 m per 0.0008 degrees at the equator; footprints are
    // defined directly in degrees around the (0, 0) target.
    fn deg(m: f64) -> f64 {
        m / 111_319.0
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![
            (x: deg(x0), y: deg(y0)),
            (x: deg(x1), y: deg(y0)),
            (x: deg(x1), y: deg(y1)),
            (x: deg(x0), y: deg(y1)),
        ]
    }

    fn footprint(polygon: Polygon<f64>, building_type: &str) -> BuildingFootprint {
        BuildingFootprint {
            polygon,
            building_type: Some(building_type.to_string()),
            office_type: None,
            levels: Some(2),
        }
    }

    fn two_buildings_with_gap() -> LayerBundle {
        LayerBundle {
            buildings: vec![
                footprint(rect(0.0, 0.0, 20.0, 20.0), "residential"),
                footprint(rect(23.0, 0.0, 43.0, 20.0), "commercial"),
            ],
            ..LayerBundle::default()
        }
    }

    fn run(layers: &LayerBundle) -> GeneratedCandidates {
        let projector = LocalProjector::new(Point::new(0.0, 0.0));
        let target_m = projector.project(Point::new(0.0, 0.0));
        generate(layers, &projector, target_m, &AnalysisConfig::default())
    }

    #[test]
    fn generates_all_three_families() {
        let mut layers = two_buildings_with_gap();
        layers.surfaces.push(SurfacePolygon {
            polygon: rect(100.0, 100.0, 150.0, 150.0),
            natural_tag: Some("wood".to_string()),
            landuse_tag: None,
        });
        let generated = run(&layers);

        let alleys: Vec<_> = generated
            .candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Alley)
            .collect();
        let vegetation: Vec<_> = generated
            .candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Vegetation)
            .collect();
        let rooftops: Vec<_> = generated
            .candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Building)
            .collect();

        assert_eq!(alleys.len(), 1, "the 3 m gap must surface as a corridor");
        assert_eq!(vegetation.len(), 1);
        assert_eq!(rooftops.len(), 2);
        assert_eq!(vegetation[0].natural_tag.as_deref(), Some("wood"));
        assert_eq!(rooftops[0].building_type.as_deref(), Some("residential"));
    }

    #[test]
    fn corridor_areas_respect_family_bounds() {
        let generated = run(&two_buildings_with_gap());
        for candidate in generated
            .candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Alley)
        {
            assert!(
                (25.0..=2000.0).contains(&candidate.area_m2),
                "corridor area {} out of bounds",
                candidate.area_m2
            );
        }
    }

    #[test]
    fn rooftop_areas_respect_family_bounds() {
        let mut layers = two_buildings_with_gap();
        // 6000 m^2 hangar: over the rooftop ceiling, must not become a
        // candidate.
        layers
            .buildings
            .push(footprint(rect(200.0, 0.0, 300.0, 60.0), "industrial"));
        let generated = run(&layers);
        for candidate in generated
            .candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Building)
        {
            assert!((50.0..=5000.0).contains(&candidate.area_m2));
        }
        assert_eq!(
            generated
                .candidates
                .iter()
                .filter(|c| c.kind == CandidateKind::Building)
                .count(),
            2
        );
    }

    #[test]
    fn malformed_polygons_are_skipped_and_counted() {
        let mut layers = two_buildings_with_gap();
        let bowtie = polygon![
            (x: deg(50.0), y: deg(50.0)),
            (x: deg(60.0), y: deg(60.0)),
            (x: deg(60.0), y: deg(50.0)),
            (x: deg(50.0), y: deg(60.0)),
        ];
        layers.buildings.push(footprint(bowtie, "residential"));
        let generated = run(&layers);
        assert_eq!(generated.invalid_geometry_count, 1);
    }

    #[test]
    fn empty_layers_generate_no_candidates() {
        let generated = run(&LayerBundle::default());
        assert!(generated.candidates.is_empty());
        assert_eq!(generated.invalid_geometry_count, 0);
    }

    #[test]
    fn candidate_ids_are_stable_and_sequential() {
        let generated = run(&two_buildings_with_gap());
        for (index, candidate) in generated.candidates.iter().enumerate() {
            assert_eq!(candidate.id, index as u64);
        }
    }
}
