//! Accessibility index: scores housing points by the size and rating of the parks
//! within walking distance, normalized across the dataset.
mod engine;
mod housing;
mod normalize;
mod reach;

pub use engine::{AccessibilityIndex, AccessibilityRecord, IndexEngine};
pub use housing::HousingPoint;
pub use normalize::{scale, NormalizationStats};
