/// Dataset-wide constants used to rescale raw indices to `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizationStats {
    pub max_size: f64,
    pub max_rating: f64,
    /// Mean raw rating index over every housing point, zeros included.
    pub mean_rating: f64,
}

impl NormalizationStats {
    /// Compute the constants from raw `(size_index, rating_index)` pairs.
    pub fn from_raw(raw: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut stats = Self::default();
        let mut sum = 0.0;
        let mut count = 0usize;
        for (size, rating) in raw {
            stats.max_size = stats.max_size.max(size);
            stats.max_rating = stats.max_rating.max(rating);
            sum += rating;
            count += 1;
        }
        if count > 0 { stats.mean_rating = sum / count as f64 }
        stats
    }

    /// A raw rating index of exactly 0 is replaced with the dataset mean.
    #[inline] pub fn backfill(&self, raw_rating: f64) -> f64 {
        if raw_rating == 0.0 { self.mean_rating } else { raw_rating }
    }

    #[inline] pub fn size(&self, raw_size: f64) -> f64 { scale(raw_size, self.max_size) }

    /// Normalized rating index, after backfill.
    #[inline] pub fn rating(&self, raw_rating: f64) -> f64 { scale(self.backfill(raw_rating), self.max_rating) }
}

/// `100 * (value / max)`, or 0 when `max` is not positive. `value == max` gives exactly 100.
pub fn scale(value: f64, max: f64) -> f64 {
    if max > 0.0 { 100.0 * (value / max) } else { 0.0 }
}
