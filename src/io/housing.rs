use std::{fs::File, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::Coord;
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReader, DataType}};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    index::{AccessibilityIndex, HousingPoint},
    io::{extension, geojson::{self, FeatureGeometry}},
};

/// Read housing locations, choosing the format from the file extension:
/// `.csv` with `Latitude`/`Longitude` columns, or `.geojson`/`.json` points.
/// Ids are assigned 1, 2, 3, ... over the points kept.
pub fn read_housing(path: &Path) -> Result<Vec<HousingPoint>> {
    let coords = match extension(path).as_str() {
        "csv" => read_housing_csv(path),
        "geojson" | "json" => parse_housing_geojson(&geojson::read_bytes(path)?),
        other => bail!("[io::housing] Unsupported housing file extension {other:?}: {}", path.display()),
    }.with_context(|| format!("[io::housing] Failed to read housing from {}", path.display()))?;

    info!("[io::housing] read {} housing points from {}", coords.len(), path.display());
    Ok(HousingPoint::sequence(coords))
}

/// Housing coordinates from a GeoJSON FeatureCollection of points. Features without a
/// Point geometry fall back to `Latitude`/`Longitude` properties, or are skipped.
pub fn parse_housing_geojson(bytes: &[u8]) -> Result<Vec<Coord<f64>>> {
    let mut coords = Vec::new();
    for (i, feature) in geojson::parse_features(bytes)?.iter().enumerate() {
        match geojson::parse_geometry(feature) {
            Ok(FeatureGeometry::Point(point)) => coords.push(point.0),
            Err(err) => warn!("[io::housing] housing feature {i} has malformed geometry, skipping: {err:#}"),
            _ => match coordinate_properties(&geojson::properties(feature)) {
                Some(coord) => coords.push(coord),
                None => warn!("[io::housing] housing feature {i} has no point location, skipping"),
            },
        }
    }
    Ok(coords)
}

fn coordinate_properties(props: &Map<String, Value>) -> Option<Coord<f64>> {
    let get = |keys: [&str; 2]| keys.iter().find_map(|key| props.get(*key).and_then(geojson::as_number));
    Some(Coord { x: get(["Longitude", "longitude"])?, y: get(["Latitude", "latitude"])? })
}

/// Housing coordinates from a CSV with `Latitude` and `Longitude` columns (any case).
/// Rows with a missing value keep their place with a non-finite coordinate.
pub fn read_housing_csv(path: &Path) -> Result<Vec<Coord<f64>>> {
    let file = File::open(path)
        .with_context(|| format!("[io::housing] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReader::new(file).finish()
        .with_context(|| format!("[io::housing] Failed to read CSV from {:?}", path))?;
    housing_from_frame(&df)
}

fn housing_from_frame(df: &DataFrame) -> Result<Vec<Coord<f64>>> {
    let column = |wanted: &str| -> Result<Vec<f64>> {
        let name = df.get_column_names().into_iter()
            .find(|name| name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow!("[io::housing] CSV has no {wanted} column"))?
            .clone();
        let values = df.column(&name)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    };

    let lats = column("Latitude")?;
    let lons = column("Longitude")?;
    Ok(lons.into_iter().zip(lats).map(|(x, y)| Coord { x, y }).collect())
}

/// Scored housing as a GeoJSON FeatureCollection of points.
pub fn scored_housing_geojson(index: &AccessibilityIndex) -> Value {
    geojson::feature_collection(index.records.iter()
        .map(|record| {
            let mut props = Map::new();
            props.insert("id".into(), record.id.into());
            props.insert("park_count".into(), record.park_count.into());
            props.insert("size_index".into(), geojson::number(record.size_index));
            props.insert("rating_index".into(), geojson::number(record.rating_index));
            props.insert("latitude".into(), geojson::number(record.latitude));
            props.insert("longitude".into(), geojson::number(record.longitude));
            props.insert("raw_size_index".into(), geojson::number(record.raw_size_index));
            props.insert("raw_rating_index".into(), geojson::number(record.raw_rating_index));
            props.insert("park_ids".into(), record.park_ids.clone().into());

            let geometry = if record.longitude.is_finite() && record.latitude.is_finite() {
                geojson::point_json(&geo::Point::new(record.longitude, record.latitude))
            } else {
                Value::Null
            };
            geojson::feature(geometry, props)
        })
        .collect())
}

pub fn write_scored_housing(path: &Path, index: &AccessibilityIndex) -> Result<()> {
    geojson::write_json(path, &scored_housing_geojson(index))?;
    info!("[io::housing] wrote {} scored housing points to {}", index.records.len(), path.display());
    Ok(())
}
