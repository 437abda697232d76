mod feature;

pub use feature::{ParkFeature, ParkName, ResolvedPark, UNNAMED_MERGED_PARK, UNNAMED_PARK};
