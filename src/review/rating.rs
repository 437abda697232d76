use crate::{config::UnratedPolicy, review::ReviewRecord};

/// Aggregate rating of a park.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    /// Review-count-weighted mean in `0..=5`.
    Rated(f64),
    /// No matched review carried any weight.
    Unrated,
}

impl Rating {
    #[inline] pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Rated(rating) => Some(*rating),
            Rating::Unrated => None,
        }
    }

    #[inline] pub fn is_rated(&self) -> bool { matches!(self, Rating::Rated(_)) }
}

/// Reviews attributed to one resolved park.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkRating {
    pub park_id: String,
    /// Name of the last matched review, if any matched.
    pub matched_name: Option<String>,
    pub rating: Rating,
    pub total_reviews: u64,
    /// Planar area of the park polygon.
    pub area: f64,
}

impl ParkRating {
    /// Fold matched reviews into a count-weighted mean. Reviews without a usable
    /// rating and count still count as matches but carry zero weight.
    pub fn aggregate<'a>(
        park_id: impl Into<String>,
        area: f64,
        matched: impl IntoIterator<Item = &'a ReviewRecord>,
    ) -> Self {
        let mut total_reviews = 0u64;
        let mut weighted = 0.0;
        let mut matched_name = None;

        for review in matched {
            if let Some((rating, count)) = review.weight() {
                total_reviews += count;
                weighted += rating * count as f64;
            }
            matched_name = Some(review.name.as_str());
        }

        Self {
            park_id: park_id.into(),
            matched_name: matched_name.map(str::to_string),
            rating: if total_reviews > 0 { Rating::Rated(weighted / total_reviews as f64) } else { Rating::Unrated },
            total_reviews,
            area,
        }
    }

    /// Numeric rating used by the index: the weighted mean, or the policy's placeholder.
    pub fn effective_rating(&self, policy: UnratedPolicy, dataset_mean: f64) -> f64 {
        match (self.rating, policy) {
            (Rating::Rated(rating), _) => rating,
            (Rating::Unrated, UnratedPolicy::Zero) => 0.0,
            (Rating::Unrated, UnratedPolicy::DatasetMean) => dataset_mean,
        }
    }
}

/// Mean of all non-zero park ratings, or 0 when no park has one.
pub fn mean_rating(ratings: &[ParkRating]) -> f64 {
    let (sum, count) = ratings.iter()
        .filter_map(|park| park.rating.value())
        .filter(|&rating| rating != 0.0)
        .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
