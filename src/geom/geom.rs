use geo::{BooleanOps, BoundingRect, MultiPolygon, Rect};
use rstar::RTree;
use smallvec::SmallVec;

use crate::geom::{bbox::{envelope_of, BoundingBox}, predicates};

/// A read-only collection of MultiPolygons with an R-tree over their bounding boxes.
///
/// Shapes without a bounding box (empty geometries) are stored but never indexed,
/// so they are never returned by a query.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    pub(crate) fn new(shapes: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
            shapes,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Get a reference to the shape at `idx`.
    #[inline] pub(crate) fn shape(&self, idx: usize) -> &MultiPolygon<f64> { &self.shapes[idx] }

    /// Indices of shapes whose bounding boxes intersect `rect`, in ascending order.
    pub(crate) fn candidates(&self, rect: &Rect<f64>) -> SmallVec<[usize; 8]> {
        let mut found = self.rtree.locate_in_envelope_intersecting(&envelope_of(rect))
            .map(BoundingBox::idx)
            .collect::<SmallVec<[usize; 8]>>();
        found.sort_unstable();
        found
    }

    /// Indices of shapes that intersect `shape`, in ascending order.
    /// Returns exactly what a scan over every shape with `predicates::intersects` would.
    pub(crate) fn intersecting(&self, shape: &MultiPolygon<f64>) -> SmallVec<[usize; 8]> {
        let Some(rect) = shape.bounding_rect() else { return SmallVec::new() };
        let mut found = self.candidates(&rect);
        found.retain(|&mut idx| predicates::intersects(shape, &self.shapes[idx]));
        found
    }
}

/// Union a set of MultiPolygons into a single MultiPolygon.
/// This may be slow for large numbers of complex polygons.
pub(crate) fn union_all<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> MultiPolygon<f64> {
    shapes.into_iter()
        .cloned()
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| MultiPolygon(vec![]))
}
