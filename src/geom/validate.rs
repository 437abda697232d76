use std::fmt;

use geo::{CoordsIter, MultiPolygon, Validation};

use crate::geom::predicates;

/// Reasons a single geometry is unusable. These are recovered by skipping the feature.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryIssue {
    /// The geometry has no polygons, or a polygon has an empty exterior.
    Empty,
    /// A coordinate is NaN or infinite.
    NonFinite,
    /// A ring has fewer than four coordinates once closed.
    TooFewPoints { points: usize },
    /// The polygon encloses no area.
    ZeroArea,
    /// Self-intersecting rings, holes outside their shell, or similar topology errors.
    Invalid,
}

impl fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryIssue::Empty => write!(f, "empty geometry"),
            GeometryIssue::NonFinite => write!(f, "non-finite coordinate"),
            GeometryIssue::TooFewPoints { points } => write!(f, "ring has {points} points, need at least 4"),
            GeometryIssue::ZeroArea => write!(f, "polygon has zero area"),
            GeometryIssue::Invalid => write!(f, "invalid polygon topology (self-intersection or misplaced hole)"),
        }
    }
}

impl std::error::Error for GeometryIssue {}

/// Check that `shape` is a usable park polygon.
pub fn validate(shape: &MultiPolygon<f64>) -> Result<(), GeometryIssue> {
    if shape.0.is_empty() { return Err(GeometryIssue::Empty) }

    for polygon in &shape.0 {
        if polygon.exterior().0.is_empty() { return Err(GeometryIssue::Empty) }

        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let points = ring.coords_count();
            if points < 4 { return Err(GeometryIssue::TooFewPoints { points }) }
        }
    }

    if !shape.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite()) {
        return Err(GeometryIssue::NonFinite)
    }

    if predicates::area(shape) <= 0.0 { return Err(GeometryIssue::ZeroArea) }

    if !shape.is_valid() { return Err(GeometryIssue::Invalid) }

    Ok(())
}

#[cfg(test)]
mod tests {
    use geo::{polygon, LineString, Polygon};

    use super::*;

    #[test]
    fn accepts_simple_square() {
        let square: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)].into();
        assert_eq!(validate(&square), Ok(()));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate(&MultiPolygon(vec![])), Err(GeometryIssue::Empty));
        let hollow = Polygon::new(LineString::<f64>(vec![]), vec![]);
        assert_eq!(validate(&hollow.into()), Err(GeometryIssue::Empty));
    }

    #[test]
    fn rejects_non_finite() {
        let shape: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: f64::NAN), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)].into();
        assert_eq!(validate(&shape), Err(GeometryIssue::NonFinite));
    }

    #[test]
    fn rejects_degenerate_ring() {
        let line: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        assert!(matches!(validate(&line), Err(GeometryIssue::TooFewPoints { .. })));

        let flat: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)].into();
        assert_eq!(validate(&flat), Err(GeometryIssue::ZeroArea));
    }

    #[test]
    fn rejects_bowtie() {
        let bowtie: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 4.0), (x: 4.0, y: 0.0), (x: 0.0, y: 2.0)].into();
        assert_eq!(validate(&bowtie), Err(GeometryIssue::Invalid));
    }

    #[test]
    fn issues_render_for_diagnostics() {
        assert_eq!(GeometryIssue::TooFewPoints { points: 2 }.to_string(), "ring has 2 points, need at least 4");
    }
}
