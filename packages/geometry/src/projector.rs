//! Locally-accurate metric projection centered on the analysis target.
//!
//! Distances and areas are only meaningful in a planar frame, so every
//! analysis projects its layers into local east/north meters before any
//! metric computation and projects results back to lon/lat for
//! serialization. The projection is a per-request equirectangular frame
//! with WGS84 arc-length scale factors fixed at the origin latitude:
//! sub-meter accurate over the few-kilometer radii this engine analyzes,
//! and exactly invertible.

use geo::{MapCoords, Point, Polygon, coord};

/// Converts geographic coordinates (lon/lat, WGS84) to and from a local
/// metric frame whose origin sits at the target point.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjector {
    origin_lon: f64,
    origin_lat: f64,
    meters_per_deg_lon: f64,
    meters_per_deg_lat: f64,
}

impl LocalProjector {
    /// Builds a projector centered on `origin` (lon/lat).
    ///
    /// Scale factors come from the WGS84 meridian and parallel arc-length
    /// series evaluated at the origin latitude.
    #[must_use]
    pub fn new(origin: Point<f64>) -> Self {
        let phi = origin.y().to_radians();
        let meters_per_deg_lat = 111_132.92 - 559.82 * (2.0 * phi).cos()
            + 1.175 * (4.0 * phi).cos()
            - 0.0023 * (6.0 * phi).cos();
        let meters_per_deg_lon =
            111_412.84 * phi.cos() - 93.5 * (3.0 * phi).cos() + 0.118 * (5.0 * phi).cos();
        Self {
            origin_lon: origin.x(),
            origin_lat: origin.y(),
            meters_per_deg_lon,
            meters_per_deg_lat,
        }
    }

    /// Projects a geographic point into local east/north meters.
    #[must_use]
    pub fn project(&self, p: Point<f64>) -> Point<f64> {
        Point::new(
            (p.x() - self.origin_lon) * self.meters_per_deg_lon,
            (p.y() - self.origin_lat) * self.meters_per_deg_lat,
        )
    }

    /// Inverse of [`Self::project`].
    #[must_use]
    pub fn unproject(&self, p: Point<f64>) -> Point<f64> {
        Point::new(
            p.x() / self.meters_per_deg_lon + self.origin_lon,
            p.y() / self.meters_per_deg_lat + self.origin_lat,
        )
    }

    /// Projects a geographic polygon into the metric frame.
    #[must_use]
    pub fn project_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        polygon.map_coords(|c| {
            coord! {
                x: (c.x - self.origin_lon) * self.meters_per_deg_lon,
                y: (c.y - self.origin_lat) * self.meters_per_deg_lat,
            }
        })
    }

    /// Projects a metric-frame polygon back to geographic coordinates.
    #[must_use]
    pub fn unproject_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        polygon.map_coords(|c| {
            coord! {
                x: c.x / self.meters_per_deg_lon + self.origin_lon,
                y: c.y / self.meters_per_deg_lat + self.origin_lat,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    #[test]
    fn origin_projects_to_zero() {
        let origin = Point::new(77.2090, 28.6139);
        let proj = LocalProjector::new(origin);
        let p = proj.project(origin);
        assert!(p.x().abs() < 1e-9);
        assert!(p.y().abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let proj = LocalProjector::new(Point::new(0.0, 0.0));
        let p = proj.project(Point::new(0.0, 1.0));
        assert!((p.y() - 110_573.0).abs() < 100.0, "got {}", p.y());
    }

    #[test]
    fn longitude_scale_shrinks_with_latitude() {
        let equator = LocalProjector::new(Point::new(0.0, 0.0));
        let oslo = LocalProjector::new(Point::new(10.75, 59.91));
        let de = equator.project(Point::new(0.01, 0.0)).x();
        let dn = oslo.project(Point::new(10.76, 59.91)).x();
        assert!(dn < de * 0.6, "expected strong shrink, got {dn} vs {de}");
    }

    #[test]
    fn round_trip_is_exact() {
        let proj = LocalProjector::new(Point::new(77.2090, 28.6139));
        let poly = polygon![
            (x: 77.2100, y: 28.6150),
            (x: 77.2120, y: 28.6150),
            (x: 77.2120, y: 28.6170),
            (x: 77.2100, y: 28.6170),
        ];
        let back = proj.unproject_polygon(&proj.project_polygon(&poly));
        for (a, b) in poly.exterior().coords().zip(back.exterior().coords()) {
            assert!((a.x - b.x).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
        }
    }
}
