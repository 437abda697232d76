//! File formats for every engine boundary.
//!
//! - `parks` - raw park polygons in, resolved and rated parks out (GeoJSON)
//! - `reviews` - review listings from JSON, CSV or GeoJSON
//! - `housing` - housing points from CSV or GeoJSON, scored housing out (GeoJSON)
//! - `geojson` - shared FeatureCollection parsing and writing
//!
//! Every reader rejects input that is not structurally a collection of the expected
//! kind. Individual features that cannot be used are skipped with a warning.
use std::path::Path;

mod geojson;
mod housing;
mod parks;
mod reviews;

pub use housing::{parse_housing_geojson, read_housing, read_housing_csv, scored_housing_geojson, write_scored_housing};
pub use parks::{
    parse_park_features, parse_rated_parks, rated_parks_geojson, read_park_features, read_rated_parks,
    read_resolved_parks, resolved_parks_geojson, write_rated_parks, write_resolved_parks,
};
pub use reviews::{parse_reviews_geojson, parse_reviews_json, read_reviews, read_reviews_csv};

/// Lowercased file extension, or an empty string.
pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
