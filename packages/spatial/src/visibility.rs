//! Sight-line visibility against the building mass.
//!
//! A candidate is *hidden* when the straight segment from its centroid to
//! its nearest road node crosses the interior of the building mass. A
//! segment that only touches a building boundary (grazing a corner or
//! running along a facade) counts as exposed. That tie-break matters:
//! corridor candidates sit flush against walls, so boundary contact is
//! the common case, not the exception.

use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::{LineString, MultiPolygon, Point, Relate};

/// Returns `true` when the segment from `from` to `to` (projected frame)
/// crosses the interior of the building mass.
#[must_use]
pub fn is_hidden(from: Point<f64>, to: Point<f64>, mass: &MultiPolygon<f64>) -> bool {
    let sight_line = LineString::from(vec![(from.x(), from.y()), (to.x(), to.y())]);
    let matrix = sight_line.relate(mass);
    matrix.get(CoordPos::Inside, CoordPos::Inside) != Dimensions::Empty
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn mass() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 10.0, y: 0.0),
            (x: 20.0, y: 0.0),
            (x: 20.0, y: 10.0),
            (x: 10.0, y: 10.0),
        ]])
    }

    #[test]
    fn segment_through_building_interior_is_hidden() {
        assert!(is_hidden(
            Point::new(0.0, 5.0),
            Point::new(30.0, 5.0),
            &mass()
        ));
    }

    #[test]
    fn clear_segment_is_exposed() {
        assert!(!is_hidden(
            Point::new(0.0, 20.0),
            Point::new(30.0, 20.0),
            &mass()
        ));
    }

    #[test]
    fn boundary_touching_segment_is_exposed() {
        // Runs exactly along the y = 10 facade: boundary contact only.
        assert!(!is_hidden(
            Point::new(0.0, 10.0),
            Point::new(30.0, 10.0),
            &mass()
        ));
    }

    #[test]
    fn corner_grazing_segment_is_exposed() {
        // The diagonal y = x touches the mass only at the (10, 10) corner.
        assert!(!is_hidden(
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            &mass()
        ));
    }

    #[test]
    fn segment_starting_inside_footprint_is_hidden() {
        // A rooftop centroid sits inside its own footprint, so its sight
        // line always crosses building interior.
        assert!(is_hidden(
            Point::new(15.0, 5.0),
            Point::new(30.0, 5.0),
            &mass()
        ));
    }
}
