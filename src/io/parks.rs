use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    io::geojson::{self, FeatureGeometry},
    park::{ParkFeature, ResolvedPark},
    review::{ParkRating, RatedPark, Rating},
};

/// Property keys with a fixed meaning; every other scalar property becomes a tag.
const RESERVED_KEYS: [&str; 3] = ["id", "name", "is_merged"];

/// Read raw park polygons from a GeoJSON FeatureCollection file.
pub fn read_park_features(path: &Path) -> Result<Vec<ParkFeature>> {
    let bytes = geojson::read_bytes(path)?;
    let features = parse_park_features(&bytes)
        .with_context(|| format!("[io::parks] Failed to read parks from {}", path.display()))?;
    info!("[io::parks] read {} park features from {}", features.len(), path.display());
    Ok(features)
}

/// Parse raw park polygons from GeoJSON bytes.
///
/// The identifier comes from `properties.id`, falling back to the feature's `id`.
/// Features without an identifier or without polygon geometry are skipped.
pub fn parse_park_features(bytes: &[u8]) -> Result<Vec<ParkFeature>> {
    let mut parks = Vec::new();
    for (i, feature) in geojson::parse_features(bytes)?.iter().enumerate() {
        let props = geojson::properties(feature);
        let Some(id) = props.get("id").or_else(|| feature.get("id")).and_then(id_string) else {
            warn!("[io::parks] feature {i} has no identifier, skipping");
            continue;
        };

        let geometry = match geojson::parse_geometry(feature) {
            Ok(FeatureGeometry::Polygonal(shape)) => shape,
            Err(err) => { warn!("[io::parks] feature {id} has malformed geometry, skipping: {err:#}"); continue }
            Ok(FeatureGeometry::Point(_)) => { warn!("[io::parks] feature {id} is a Point, skipping"); continue }
            Ok(FeatureGeometry::Other(kind)) => { warn!("[io::parks] feature {id} is a {kind}, skipping"); continue }
            Ok(FeatureGeometry::Null) => { warn!("[io::parks] feature {id} has no geometry, skipping"); continue }
        };

        let mut park = ParkFeature::new(id, props.get("name").and_then(Value::as_str), geometry);
        for (key, value) in props {
            if RESERVED_KEYS.contains(&key.as_str()) || value.is_object() || value.is_array() { continue }
            park.tags.insert(key, value);
        }
        parks.push(park);
    }
    Ok(parks)
}

/// Identifiers may be strings or integers in the source data.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolved parks as a GeoJSON FeatureCollection with `id`, `name`, `is_merged` and tags.
pub fn resolved_parks_geojson(parks: &[ResolvedPark]) -> Value {
    geojson::feature_collection(parks.iter()
        .map(|park| {
            let mut props = park_properties(park);
            for (key, value) in &park.feature.tags {
                props.entry(key.clone()).or_insert_with(|| value.clone());
            }
            geojson::feature(geojson::multipolygon_json(park.geometry()), props)
        })
        .collect())
}

pub fn write_resolved_parks(path: &Path, parks: &[ResolvedPark]) -> Result<()> {
    geojson::write_json(path, &resolved_parks_geojson(parks))?;
    info!("[io::parks] wrote {} resolved parks to {}", parks.len(), path.display());
    Ok(())
}

/// Read resolved parks written by [`write_resolved_parks`].
pub fn read_resolved_parks(path: &Path) -> Result<Vec<ResolvedPark>> {
    let bytes = geojson::read_bytes(path)?;
    let values = geojson::parse_features(&bytes)?;
    let features = parse_park_features(&bytes)
        .with_context(|| format!("[io::parks] Failed to read parks from {}", path.display()))?;

    let merged = values.iter()
        .filter_map(|feature| {
            let props = feature.get("properties")?;
            Some((id_string(props.get("id")?)?, props.get("is_merged")?.as_bool()?))
        })
        .collect::<ahash::AHashMap<_, _>>();

    Ok(features.into_iter()
        .map(|feature| ResolvedPark { is_merged: merged.get(&feature.id).copied().unwrap_or(false), feature })
        .collect())
}

/// Rated parks as a GeoJSON FeatureCollection.
///
/// `rating` is the rating used by the index and `rated` tells whether it came from reviews.
pub fn rated_parks_geojson(parks: &[RatedPark]) -> Value {
    geojson::feature_collection(parks.iter()
        .map(|rated| {
            let mut props = park_properties(&rated.park);
            props.insert("name".into(), rated.display_name().into());
            props.insert("rating".into(), geojson::number(rated.effective_rating));
            props.insert("rated".into(), rated.rating.rating.is_rated().into());
            props.insert("total_reviews".into(), rated.rating.total_reviews.into());
            props.insert("area".into(), geojson::number(rated.rating.area));
            geojson::feature(geojson::multipolygon_json(rated.park.geometry()), props)
        })
        .collect())
}

pub fn write_rated_parks(path: &Path, parks: &[RatedPark]) -> Result<()> {
    geojson::write_json(path, &rated_parks_geojson(parks))?;
    info!("[io::parks] wrote {} rated parks to {}", parks.len(), path.display());
    Ok(())
}

/// Read rated parks written by [`write_rated_parks`]. Area is recomputed from the geometry.
pub fn read_rated_parks(path: &Path) -> Result<Vec<RatedPark>> {
    let bytes = geojson::read_bytes(path)?;
    parse_rated_parks(&bytes)
        .with_context(|| format!("[io::parks] Failed to read rated parks from {}", path.display()))
}

pub fn parse_rated_parks(bytes: &[u8]) -> Result<Vec<RatedPark>> {
    let mut parks = Vec::new();
    for (i, feature) in geojson::parse_features(bytes)?.iter().enumerate() {
        let props = geojson::properties(feature);
        let Some(id) = props.get("id").and_then(id_string) else {
            warn!("[io::parks] rated park {i} has no identifier, skipping");
            continue;
        };
        let Ok(FeatureGeometry::Polygonal(geometry)) = geojson::parse_geometry(feature) else {
            warn!("[io::parks] rated park {id} has no polygon geometry, skipping");
            continue;
        };

        let rating = props.get("rating").and_then(geojson::as_number).filter(|r| r.is_finite()).unwrap_or(0.0);
        let rated = props.get("rated").and_then(Value::as_bool).unwrap_or(rating > 0.0);
        let park = ResolvedPark {
            feature: ParkFeature::new(id.clone(), props.get("name").and_then(Value::as_str), geometry),
            is_merged: props.get("is_merged").and_then(Value::as_bool).unwrap_or(false),
        };
        parks.push(RatedPark {
            rating: ParkRating {
                park_id: id,
                matched_name: None,
                rating: if rated { Rating::Rated(rating) } else { Rating::Unrated },
                total_reviews: props.get("total_reviews").and_then(Value::as_u64).unwrap_or(0),
                area: park.area(),
            },
            effective_rating: rating,
            park,
        });
    }
    Ok(parks)
}

fn park_properties(park: &ResolvedPark) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("id".into(), park.id().into());
    props.insert("name".into(), park.name().as_str().into());
    props.insert("is_merged".into(), park.is_merged.into());
    props
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;
    use crate::park::ParkName;

    const PARKS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "way/1",
              "properties": { "name": "Grant Park", "leisure": "park", "nested": { "a": 1 } },
              "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]] } },
            { "type": "Feature",
              "properties": { "id": 42, "name": null },
              "geometry": { "type": "MultiPolygon", "coordinates": [[[[2, 2], [2, 3], [3, 3], [3, 2], [2, 2]]]] } },
            { "type": "Feature", "properties": { "id": "p" }, "geometry": { "type": "Point", "coordinates": [0, 0] } },
            { "type": "Feature", "properties": { "name": "No id" }, "geometry": null }
        ]
    }"#;

    #[test]
    fn parses_ids_names_and_tags() {
        let parks = parse_park_features(PARKS.as_bytes()).unwrap();
        assert_eq!(parks.len(), 2);

        assert_eq!(parks[0].id, "way/1");
        assert_eq!(parks[0].name, ParkName::Named("Grant Park".into()));
        assert_eq!(parks[0].tags.keys().collect::<Vec<_>>(), vec!["leisure"]);

        assert_eq!(parks[1].id, "42");
        assert_eq!(parks[1].name, ParkName::Unnamed);
        assert_eq!(parks[1].geometry.0.len(), 1);
    }

    #[test]
    fn malformed_geometry_skips_only_that_feature() {
        let parks = parse_park_features(br#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "id": "ok" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]] } },
                { "type": "Feature", "properties": { "id": "empty" }, "geometry": { "type": "Polygon", "coordinates": [] } },
                { "type": "Feature", "properties": { "id": "ring" }, "geometry": { "type": "Polygon", "coordinates": [7] } },
                { "type": "Feature", "properties": { "id": "short" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0], [0, 1], [1, 1], [0]]] } }
            ]
        }"#).unwrap();
        assert_eq!(parks.iter().map(|park| park.id.as_str()).collect::<Vec<_>>(), vec!["ok"]);

        let rated = parse_rated_parks(br#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "id": "empty", "rating": 4 }, "geometry": { "type": "Polygon", "coordinates": [] } },
                { "type": "Feature", "properties": { "id": "ok", "rating": 4 },
                  "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]] } }
            ]
        }"#).unwrap();
        assert_eq!(rated.len(), 1);
        assert_eq!(rated[0].park.id(), "ok");
    }

    #[test]
    fn resolved_properties_include_flags_and_tags() {
        let park = ResolvedPark {
            feature: ParkFeature::new("m1", Some("Unnamed Merged Park"), polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0)])
                .with_tag("leisure", "park"),
            is_merged: true,
        };
        let collection = resolved_parks_geojson(&[park]);
        let props = &collection["features"][0]["properties"];

        assert_eq!(props["id"], "m1");
        assert_eq!(props["name"], "Unnamed Merged Park");
        assert_eq!(props["is_merged"], true);
        assert_eq!(props["leisure"], "park");
    }

    #[test]
    fn reparsed_resolved_parks_keep_tags_only() {
        let park = ResolvedPark {
            feature: ParkFeature::new("7", Some("Oz Park"), polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0)])
                .with_tag("landuse", "recreation_ground"),
            is_merged: false,
        };
        let bytes = serde_json::to_vec(&resolved_parks_geojson(&[park.clone()])).unwrap();
        let parsed = parse_park_features(&bytes).unwrap();
        assert_eq!(parsed, vec![park.feature]);
    }
}
