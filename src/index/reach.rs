use geo::MultiPolygon;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::geom::Geometries;

/// For each buffer, the ascending indices of the parks it intersects.
///
/// Candidates come from the R-tree and are confirmed with an exact intersection test,
/// so the result equals an exhaustive scan with [`crate::geom::intersects`].
pub(crate) fn reachable(buffers: &[MultiPolygon<f64>], parks: &Geometries) -> Vec<SmallVec<[usize; 8]>> {
    buffers.par_iter()
        .map(|buffer| parks.intersecting(buffer))
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::polygon;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::geom;

    fn reachable_brute_force(buffers: &[MultiPolygon<f64>], parks: &[MultiPolygon<f64>]) -> Vec<Vec<usize>> {
        buffers.iter()
            .map(|buffer| (0..parks.len()).filter(|&j| geom::intersects(buffer, &parks[j])).collect())
            .collect()
    }

    fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
        polygon![(x: x, y: y), (x: x, y: y + side), (x: x + side, y: y + side), (x: x + side, y: y)].into()
    }

    #[test]
    fn rtree_scan_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(17);
        let parks = (0..60)
            .map(|_| square(rng.random_range(0.0..10.0), rng.random_range(0.0..10.0), rng.random_range(0.1..1.5)))
            .collect::<Vec<_>>();
        let buffers = (0..40)
            .map(|_| square(rng.random_range(-1.0..11.0), rng.random_range(-1.0..11.0), rng.random_range(0.1..2.0)))
            .collect::<Vec<_>>();

        let fast = reachable(&buffers, &Geometries::new(parks.clone()));
        let slow = reachable_brute_force(&buffers, &parks);
        assert_eq!(fast.iter().map(|found| found.to_vec()).collect::<Vec<_>>(), slow);
    }

    #[test]
    fn touching_counts_as_reachable() {
        let parks = vec![square(1.0, 0.0, 1.0), square(5.0, 5.0, 1.0)];
        let found = reachable(&[square(0.0, 0.0, 1.0)], &Geometries::new(parks));
        assert_eq!(found[0].as_slice(), &[0]);
    }

    #[test]
    fn empty_inputs() {
        assert!(reachable(&[], &Geometries::new(vec![square(0.0, 0.0, 1.0)])).is_empty());
        let found = reachable(&[square(0.0, 0.0, 1.0)], &Geometries::new(vec![]));
        assert!(found[0].is_empty());
    }
}
