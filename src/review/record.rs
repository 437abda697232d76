use geo::{MultiPolygon, Point};

/// One aggregated place listing from a review source.
///
/// `rating` and `review_count` are optional because sources omit them for new or
/// closed listings. Such records still match parks but carry no weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub name: String,
    /// Listing location as lon/lat.
    pub coord: Point<f64>,
    /// Precomputed buffered area of the listing. Built from `coord` when absent.
    pub footprint: Option<MultiPolygon<f64>>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    /// Source tag, e.g. `google` or `yelp`.
    pub source: String,
}

impl ReviewRecord {
    pub fn new(name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            name: name.into(),
            coord: Point::new(lon, lat),
            footprint: None,
            rating: None,
            review_count: None,
            source: String::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64, review_count: u64) -> Self {
        self.rating = Some(rating);
        self.review_count = Some(review_count);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_footprint(mut self, footprint: impl Into<MultiPolygon<f64>>) -> Self {
        self.footprint = Some(footprint.into());
        self
    }

    /// Rating and count if both are usable: a finite rating in `0..=5` and a count present.
    pub fn weight(&self) -> Option<(f64, u64)> {
        let rating = self.rating.filter(|r| r.is_finite() && (0.0..=5.0).contains(r))?;
        Some((rating, self.review_count?))
    }

    #[inline] pub fn latitude(&self) -> f64 { self.coord.y() }

    #[inline] pub fn longitude(&self) -> f64 { self.coord.x() }
}
