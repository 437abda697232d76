use geo::{Area, Intersects, MultiPolygon, Relate};

/// Returns true if `a` and `b` share at least one point. Boundary contact counts.
#[inline]
pub fn intersects(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    a.intersects(b)
}

/// Returns true if `b` lies inside `a`: no point of `b` is outside `a` and the interiors meet.
#[inline]
pub fn contains(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    a.relate(b).is_contains()
}

/// Returns true if `a` and `b` are topologically equal (same interior and boundary).
/// Overlapping shapes with any difference in extent are not equal.
#[inline]
pub fn equals(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    a.relate(b).is_equal_topo()
}

/// Planar area in squared coordinate units. Never negative.
#[inline]
pub fn area(a: &MultiPolygon<f64>) -> f64 {
    a.unsigned_area()
}

/// How two shapes relate, as far as the resolution pass cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PairRelation {
    Disjoint,
    Equal,
    Intersecting,
}

/// Classify a pair from a single DE-9IM computation.
pub(crate) fn relation(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> PairRelation {
    let im = a.relate(b);
    if !im.is_intersects() { PairRelation::Disjoint }
    else if im.is_equal_topo() { PairRelation::Equal }
    else { PairRelation::Intersecting }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        polygon![(x: x0, y: y0), (x: x0, y: y1), (x: x1, y: y1), (x: x1, y: y0)].into()
    }

    #[test]
    fn intersects_includes_boundary_contact() {
        assert!(intersects(&rect(0.0, 0.0, 2.0, 2.0), &rect(1.0, 1.0, 3.0, 3.0)));
        assert!(intersects(&rect(0.0, 0.0, 1.0, 1.0), &rect(1.0, 0.0, 2.0, 1.0)));
        assert!(!intersects(&rect(0.0, 0.0, 1.0, 1.0), &rect(2.0, 0.0, 3.0, 1.0)));
    }

    #[test]
    fn contains_is_directional() {
        let outer = rect(4.0, 0.0, 6.0, 2.0);
        let inner = rect(4.5, 0.5, 5.5, 1.5);
        assert!(contains(&outer, &inner));
        assert!(!contains(&inner, &outer));
        assert!(!contains(&outer, &rect(5.0, 1.0, 7.0, 3.0)));
    }

    #[test]
    fn equals_requires_identical_extent() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        // Same square, different starting vertex.
        let b: MultiPolygon<f64> = polygon![(x: 2.0, y: 2.0), (x: 2.0, y: 0.0), (x: 0.0, y: 0.0), (x: 0.0, y: 2.0)].into();
        assert!(equals(&a, &b));
        assert!(!equals(&a, &rect(0.0, 0.0, 2.0, 2.5)));
    }

    #[test]
    fn relation_classifies_pairs() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(relation(&a, &a.clone()), PairRelation::Equal);
        assert_eq!(relation(&a, &rect(1.0, 1.0, 3.0, 3.0)), PairRelation::Intersecting);
        assert_eq!(relation(&a, &rect(5.0, 5.0, 6.0, 6.0)), PairRelation::Disjoint);
    }

    #[test]
    fn area_is_unsigned() {
        // Clockwise ring.
        let cw: MultiPolygon<f64> = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)].into();
        assert_eq!(area(&cw), 4.0);
    }
}
