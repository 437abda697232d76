//! Review attribution: matches review listings to resolved parks and aggregates
//! their ratings into one [`ParkRating`] per park.
mod engine;
mod matcher;
mod rating;
mod record;

pub use engine::{Attributor, RatedPark};
pub use matcher::{NameMatcher, ParkNameQuery};
pub use rating::{mean_rating, ParkRating, Rating};
pub use record::ReviewRecord;
