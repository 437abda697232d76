use geo::{Coord, Point};

/// A housing location with its 1-based position in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HousingPoint {
    pub id: usize,
    /// Location as lon/lat.
    pub coord: Point<f64>,
}

impl HousingPoint {
    /// Number coordinates 1, 2, 3, ... in input order.
    pub fn sequence(coords: impl IntoIterator<Item = Coord<f64>>) -> Vec<Self> {
        coords.into_iter()
            .enumerate()
            .map(|(i, coord)| Self { id: i + 1, coord: Point(coord) })
            .collect()
    }

    #[inline] pub fn latitude(&self) -> f64 { self.coord.y() }

    #[inline] pub fn longitude(&self) -> f64 { self.coord.x() }
}
