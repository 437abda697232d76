use std::f64::consts::TAU;

use anyhow::{ensure, Result};
use geo::{BooleanOps, BoundingRect, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::geom::{ProjectionKind, Projector};

/// Default number of segments used to approximate a full circle.
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;

/// Geometries that can be expanded outward by a distance in meters.
///
/// Buffers are computed in the projector's metric CRS and returned in lon/lat.
pub trait Buffer {
    fn buffer_with(&self, projector: &Projector, distance_m: f64, segments: usize) -> Result<MultiPolygon<f64>>;
}

impl Buffer for Point<f64> {
    fn buffer_with(&self, projector: &Projector, distance_m: f64, segments: usize) -> Result<MultiPolygon<f64>> {
        ensure!(distance_m >= 0.0 && distance_m.is_finite(), "[geom::buffer] invalid buffer distance {distance_m}");
        ensure!(segments >= 3, "[geom::buffer] a circle needs at least 3 segments, got {segments}");

        let center = projector.to_metric(self.0)?;
        let circle = circle(center, distance_m, segments);
        projector.shape_to_geographic(&circle.into())
    }
}

impl Buffer for Polygon<f64> {
    fn buffer_with(&self, projector: &Projector, distance_m: f64, segments: usize) -> Result<MultiPolygon<f64>> {
        MultiPolygon(vec![self.clone()]).buffer_with(projector, distance_m, segments)
    }
}

impl Buffer for MultiPolygon<f64> {
    fn buffer_with(&self, projector: &Projector, distance_m: f64, segments: usize) -> Result<MultiPolygon<f64>> {
        ensure!(distance_m >= 0.0 && distance_m.is_finite(), "[geom::buffer] invalid buffer distance {distance_m}");
        ensure!(segments >= 3, "[geom::buffer] a circle needs at least 3 segments, got {segments}");
        if distance_m == 0.0 { return Ok(self.clone()) }

        let metric = projector.shape_to_metric(self)?;
        let expanded = minkowski_disk(&metric, distance_m, segments);
        projector.shape_to_geographic(&expanded)
    }
}

/// Buffer `geometry` by `distance_m` meters, choosing a metric CRS centered on the geometry.
pub fn buffer<G>(geometry: &G, distance_m: f64, kind: ProjectionKind) -> Result<MultiPolygon<f64>>
where
    G: Buffer + BoundingRect<f64>,
    G::Output: Into<Option<geo::Rect<f64>>>,
{
    let bounds = geometry.bounding_rect().into();
    let projector = Projector::for_bounds(kind, bounds)?;
    geometry.buffer_with(&projector, distance_m, DEFAULT_CIRCLE_SEGMENTS)
}

/// Regular polygon inscribed in the circle of radius `radius` around `center`.
fn circle(center: Coord<f64>, radius: f64, segments: usize) -> Polygon<f64> {
    let ring = (0..=segments)
        .map(|k| {
            let angle = TAU * (k % segments) as f64 / segments as f64;
            Coord { x: center.x + radius * angle.cos(), y: center.y + radius * angle.sin() }
        })
        .collect::<Vec<_>>();
    Polygon::new(LineString(ring), vec![])
}

/// Rectangle of half-width `radius` around the segment `a`-`b`, or None for a zero-length segment.
fn edge_band(a: Coord<f64>, b: Coord<f64>, radius: f64) -> Option<Polygon<f64>> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length = dx.hypot(dy);
    if length == 0.0 { return None }

    let n = Coord { x: -dy / length * radius, y: dx / length * radius };
    Some(Polygon::new(LineString(vec![a + n, b + n, b - n, a - n, a + n]), vec![]))
}

/// Minkowski sum of a shape with a disk: the shape unioned with a capsule around every ring edge.
fn minkowski_disk(shape: &MultiPolygon<f64>, radius: f64, segments: usize) -> MultiPolygon<f64> {
    let mut pieces = Vec::new();
    for polygon in &shape.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for line in ring.lines() {
                pieces.push(circle(line.start, radius, segments));
                pieces.extend(edge_band(line.start, line.end, radius));
            }
        }
    }

    pieces.into_iter()
        .fold(shape.clone(), |acc, piece| acc.union(&MultiPolygon(vec![piece])))
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Area, Contains};

    use super::*;

    const CHICAGO: Coord<f64> = Coord { x: -87.6298, y: 41.8781 };

    /// Degrees of latitude per meter, close enough for test margins.
    const DEG_PER_M: f64 = 1.0 / 111_320.0;

    #[test]
    fn point_buffer_reaches_radius() {
        let projector = Projector::new(ProjectionKind::Utm, CHICAGO).unwrap();
        let disk = Point(CHICAGO).buffer_with(&projector, 1000.0, DEFAULT_CIRCLE_SEGMENTS).unwrap();

        let inside = Point::new(CHICAGO.x, CHICAGO.y + 900.0 * DEG_PER_M);
        let outside = Point::new(CHICAGO.x, CHICAGO.y + 1100.0 * DEG_PER_M);
        assert!(disk.contains(&inside));
        assert!(!disk.contains(&outside));
        assert_eq!(disk.0[0].exterior().0.len(), DEFAULT_CIRCLE_SEGMENTS + 1);
    }

    #[test]
    fn circle_area_approaches_pi_r_squared() {
        let disk = circle(Coord { x: 0.0, y: 0.0 }, 10.0, 256);
        let expected = std::f64::consts::PI * 100.0;
        assert!((disk.unsigned_area() - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn polygon_buffer_grows_every_side() {
        let square: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0)].into();
        let grown = minkowski_disk(&square, 1.0, 32);

        // Square + four 10x1 bands + four quarter disks.
        let expected = 100.0 + 40.0 + std::f64::consts::PI;
        assert!((grown.unsigned_area() - expected).abs() < 0.05, "area {}", grown.unsigned_area());
        assert!(grown.contains(&Point::new(-0.9, 5.0)));
        assert!(grown.contains(&Point::new(5.0, 10.9)));
        assert!(!grown.contains(&Point::new(-1.1, 5.0)));
    }

    #[test]
    fn zero_distance_is_identity() {
        let projector = Projector::new(ProjectionKind::Utm, CHICAGO).unwrap();
        let shape: MultiPolygon<f64> = polygon![
            (x: -87.63, y: 41.87), (x: -87.63, y: 41.88), (x: -87.62, y: 41.88), (x: -87.62, y: 41.87),
        ].into();
        assert_eq!(shape.buffer_with(&projector, 0.0, 16).unwrap(), shape);
    }

    #[test]
    fn negative_distance_is_rejected() {
        assert!(buffer(&Point(CHICAGO), -5.0, ProjectionKind::Utm).is_err());
    }

    #[test]
    fn free_buffer_centers_projection_on_geometry() {
        let disk = buffer(&Point(CHICAGO), 250.0, ProjectionKind::Utm).unwrap();
        assert!(disk.contains(&Point(CHICAGO)));
        assert!(!disk.contains(&Point::new(CHICAGO.x, CHICAGO.y + 300.0 * DEG_PER_M)));
    }
}
