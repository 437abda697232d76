use geo::BoundingRect;
use rayon::prelude::*;

use crate::geom::{self, Geometries, PairRelation};

/// Outcome of the pairwise scan. Indices refer to the scanned collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Classification {
    /// Pairs of intersecting unnamed polygons, `i < j`.
    pub edges: Vec<(usize, usize)>,
    /// Unnamed polygons that intersect a named one. Sorted, no duplicates.
    pub unnamed_removals: Vec<usize>,
    /// Intersecting named pairs awaiting the containment check, `i < j`.
    pub containment_candidates: Vec<(usize, usize)>,
}

/// Per-row partial result, produced independently for each `i`.
#[derive(Default)]
struct Row {
    edges: Vec<(usize, usize)>,
    unnamed_removals: Vec<usize>,
    containment_candidates: Vec<(usize, usize)>,
}

/// Classify every unordered pair of shapes that intersect without being equal.
///
/// `named[i]` tells whether shape `i` carries a real name. Rows are scanned in parallel
/// and merged in row order, so the result does not depend on scheduling.
pub(crate) fn classify_pairs(named: &[bool], geoms: &Geometries) -> Classification {
    assert_eq!(named.len(), geoms.len(), "named.len() must equal geoms.len()");

    let rows = (0..geoms.len()).into_par_iter()
        .map(|i| classify_row(i, named, geoms))
        .collect::<Vec<_>>();

    let mut result = Classification::default();
    for row in rows {
        result.edges.extend(row.edges);
        result.unnamed_removals.extend(row.unnamed_removals);
        result.containment_candidates.extend(row.containment_candidates);
    }
    result.unnamed_removals.sort_unstable();
    result.unnamed_removals.dedup();
    result
}

/// Classify all pairs `(i, j)` with `j > i`.
fn classify_row(i: usize, named: &[bool], geoms: &Geometries) -> Row {
    let mut row = Row::default();
    let shape = geoms.shape(i);
    let Some(rect) = shape.bounding_rect() else { return row };

    for j in geoms.candidates(&rect).into_iter().filter(|&j| j > i) {
        if geom::relation(shape, geoms.shape(j)) != PairRelation::Intersecting { continue }

        match (named[i], named[j]) {
            (false, false) => row.edges.push((i, j)),
            (false, true) => row.unnamed_removals.push(i),
            (true, false) => row.unnamed_removals.push(j),
            (true, true) => row.containment_candidates.push((i, j)),
        }
    }
    row
}

/// Members of candidate pairs that lie inside their partner. Sorted, no duplicates.
/// Pairs that overlap without containment are left alone.
pub(crate) fn contained_members(candidates: &[(usize, usize)], geoms: &Geometries) -> Vec<usize> {
    let mut removed = candidates.par_iter()
        .filter_map(|&(i, j)| {
            let (a, b) = (geoms.shape(i), geoms.shape(j));
            if geom::contains(a, b) { Some(j) }
            else if geom::contains(b, a) { Some(i) }
            else { None }
        })
        .collect::<Vec<_>>();
    removed.sort_unstable();
    removed.dedup();
    removed
}
