use std::{fs::File, path::Path};

use anyhow::{bail, Context, Result};
use geo::Centroid;
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReader, DataType}};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    io::{extension, geojson::{self, FeatureGeometry}},
    review::ReviewRecord,
};

/// A review listing as written by the collection scripts. Every field is loose
/// because sources disagree on types and omit values.
#[derive(Debug, Deserialize)]
struct RawReview {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    latitude: Value,
    #[serde(default)]
    longitude: Value,
    #[serde(default)]
    rating: Value,
    #[serde(default)]
    review_count: Value,
    #[serde(default)]
    source: Option<String>,
}

impl RawReview {
    fn into_record(self) -> ReviewRecord {
        let lon = geojson::as_number(&self.longitude).unwrap_or(f64::NAN);
        let lat = geojson::as_number(&self.latitude).unwrap_or(f64::NAN);
        ReviewRecord {
            rating: geojson::as_number(&self.rating),
            review_count: geojson::as_number(&self.review_count).and_then(review_count),
            source: self.source.unwrap_or_default(),
            ..ReviewRecord::new(self.name.unwrap_or_default(), lon, lat)
        }
    }
}

/// A count is usable if it is a finite, non-negative whole number.
fn review_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
}

/// Read review records, choosing the format from the file extension:
/// `.json` (array of listings), `.csv`, or `.geojson` (listings with footprints).
pub fn read_reviews(path: &Path) -> Result<Vec<ReviewRecord>> {
    let reviews = match extension(path).as_str() {
        "json" => parse_reviews_json(&geojson::read_bytes(path)?),
        "csv" => read_reviews_csv(path),
        "geojson" => parse_reviews_geojson(&geojson::read_bytes(path)?),
        other => bail!("[io::reviews] Unsupported review file extension {other:?}: {}", path.display()),
    }.with_context(|| format!("[io::reviews] Failed to read reviews from {}", path.display()))?;

    info!("[io::reviews] read {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

/// Parse a JSON array of review listings.
pub fn parse_reviews_json(bytes: &[u8]) -> Result<Vec<ReviewRecord>> {
    let raw: Vec<RawReview> = serde_json::from_slice(bytes)
        .context("[io::reviews] Expected a JSON array of review objects")?;
    Ok(raw.into_iter().map(RawReview::into_record).collect())
}

/// Read review listings from a CSV file with `name`, `latitude` and `longitude`
/// columns and optional `rating`, `review_count` and `source` columns.
pub fn read_reviews_csv(path: &Path) -> Result<Vec<ReviewRecord>> {
    let file = File::open(path)
        .with_context(|| format!("[io::reviews] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReader::new(file).finish()
        .with_context(|| format!("[io::reviews] Failed to read CSV from {:?}", path))?;
    reviews_from_frame(&df)
}

fn reviews_from_frame(df: &DataFrame) -> Result<Vec<ReviewRecord>> {
    let float = |name: &str| -> Result<Vec<Option<f64>>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        Ok(column.f64()?.into_iter().collect())
    };
    let optional_float = |name: &str| -> Result<Vec<Option<f64>>> {
        if df.get_column_names().iter().any(|c| c.as_str() == name) { float(name) } else { Ok(vec![None; df.height()]) }
    };
    let string = |name: &str| -> Result<Vec<Option<String>>> {
        if !df.get_column_names().iter().any(|c| c.as_str() == name) { return Ok(vec![None; df.height()]) }
        let column = df.column(name)?.cast(&DataType::String)?;
        Ok(column.str()?.into_iter().map(|s| s.map(str::to_string)).collect())
    };

    let names = string("name")?;
    let lats = float("latitude").context("[io::reviews] CSV needs a numeric latitude column")?;
    let lons = float("longitude").context("[io::reviews] CSV needs a numeric longitude column")?;
    let ratings = optional_float("rating")?;
    let counts = optional_float("review_count")?;
    let sources = string("source")?;

    Ok((0..df.height())
        .map(|i| ReviewRecord {
            rating: ratings[i],
            review_count: counts[i].and_then(review_count),
            source: sources[i].clone().unwrap_or_default(),
            ..ReviewRecord::new(names[i].clone().unwrap_or_default(), lons[i].unwrap_or(f64::NAN), lats[i].unwrap_or(f64::NAN))
        })
        .collect())
}

/// Parse review listings from a GeoJSON FeatureCollection.
///
/// Polygon geometries become precomputed footprints. The listing location comes from
/// `latitude`/`longitude` properties, a Point geometry, or the footprint centroid.
pub fn parse_reviews_geojson(bytes: &[u8]) -> Result<Vec<ReviewRecord>> {
    let mut reviews = Vec::new();
    for (i, feature) in geojson::parse_features(bytes)?.iter().enumerate() {
        let props = Value::Object(geojson::properties(feature));
        let raw = RawReview::deserialize(&props)
            .with_context(|| format!("[io::reviews] review feature {i} has malformed properties"))?;
        let mut record = raw.into_record();

        match geojson::parse_geometry(feature) {
            Err(err) => {
                warn!("[io::reviews] review feature {i} has malformed geometry, skipping: {err:#}");
                continue;
            }
            Ok(FeatureGeometry::Polygonal(footprint)) => {
                if !record.coord.x().is_finite() || !record.coord.y().is_finite() {
                    if let Some(centroid) = footprint.centroid() { record.coord = centroid }
                }
                record.footprint = Some(footprint);
            }
            Ok(FeatureGeometry::Point(point)) if !point.x().is_finite() || !point.y().is_finite() => {}
            Ok(FeatureGeometry::Point(point)) => {
                if !record.coord.x().is_finite() || !record.coord.y().is_finite() { record.coord = point }
            }
            Ok(FeatureGeometry::Other(kind)) => warn!("[io::reviews] review feature {i} has unsupported {kind} geometry"),
            Ok(FeatureGeometry::Null) => {}
        }
        reviews.push(record);
    }
    Ok(reviews)
}
