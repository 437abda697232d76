#![doc = "Green-space accessibility index: park polygon resolution, review attribution and housing scores"]
mod config;
mod geom;
mod index;
mod io;
mod park;
mod pipeline;
mod resolve;
mod review;

#[doc(inline)]
pub use config::{Config, IndexConfig, ResolveConfig, ReviewConfig, UnratedPolicy};

#[doc(inline)]
pub use geom::{area, buffer, contains, equals, intersects, validate, Buffer, GeometryIssue, ProjectionKind, Projector, DEFAULT_CIRCLE_SEGMENTS};

#[doc(inline)]
pub use park::{ParkFeature, ParkName, ResolvedPark, UNNAMED_MERGED_PARK, UNNAMED_PARK};

#[doc(inline)]
pub use resolve::{MergedCluster, Resolution, ResolutionReport, Resolver, SkipReason, SkippedFeature};

#[doc(inline)]
pub use review::{mean_rating, Attributor, NameMatcher, ParkNameQuery, ParkRating, RatedPark, Rating, ReviewRecord};

#[doc(inline)]
pub use index::{scale, AccessibilityIndex, AccessibilityRecord, HousingPoint, IndexEngine, NormalizationStats};

#[doc(inline)]
pub use pipeline::{Pipeline, PipelineOutput};

pub use io::{
    parse_housing_geojson, parse_park_features, parse_rated_parks, parse_reviews_geojson, parse_reviews_json,
    rated_parks_geojson, read_housing, read_housing_csv, read_park_features, read_rated_parks, read_resolved_parks,
    read_reviews, read_reviews_csv, resolved_parks_geojson, scored_housing_geojson, write_rated_parks,
    write_resolved_parks, write_scored_housing,
};
