use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Map, Value};

/// Geometry of a GeoJSON feature, reduced to the kinds this crate consumes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FeatureGeometry {
    /// Polygon or MultiPolygon.
    Polygonal(MultiPolygon<f64>),
    Point(Point<f64>),
    /// Any other geometry type, by name.
    Other(String),
    Null,
}

/// Read a file into memory.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("[io::geojson] Failed to read file: {}", path.display()))
}

/// Parse `bytes` as a GeoJSON FeatureCollection and return its features.
pub(crate) fn parse_features(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON")?;

    let kind = value.get("type").and_then(Value::as_str);
    ensure!(kind == Some("FeatureCollection"),
        "[io::geojson] Expected a FeatureCollection, found {}", kind.map_or("no \"type\"".to_string(), |k| format!("type {k:?}")));

    match value.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => Ok(features),
        Some(_) => bail!("[io::geojson] FeatureCollection \"features\" must be an array"),
        None => bail!("[io::geojson] FeatureCollection has no \"features\" member"),
    }
}

/// Properties object of a feature. Missing or null properties read as empty.
pub(crate) fn properties(feature: &Value) -> Map<String, Value> {
    match feature.get("properties") {
        Some(Value::Object(props)) => props.clone(),
        _ => Map::new(),
    }
}

/// Parse the geometry member of a feature.
pub(crate) fn parse_geometry(feature: &Value) -> Result<FeatureGeometry> {
    let geometry = match feature.get("geometry") {
        None | Some(Value::Null) => return Ok(FeatureGeometry::Null),
        Some(geometry) => geometry,
    };
    let kind = geometry.get("type").and_then(Value::as_str)
        .ok_or_else(|| anyhow!("[io::geojson] Geometry has no \"type\""))?;
    let coords = || geometry.get("coordinates").and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[io::geojson] {kind} geometry has no coordinate array"));

    Ok(match kind {
        "Polygon" => FeatureGeometry::Polygonal(MultiPolygon(vec![parse_polygon_coords(coords()?)?])),
        "MultiPolygon" => FeatureGeometry::Polygonal(parse_multipolygon_coords(coords()?)?),
        "Point" => FeatureGeometry::Point(Point(parse_position(coords()?)?)),
        other => FeatureGeometry::Other(other.to_string()),
    })
}

/// Parse MultiPolygon coordinates: `[polygon, ...]`.
fn parse_multipolygon_coords(coords: &[Value]) -> Result<MultiPolygon<f64>> {
    coords.iter()
        .map(|polygon| {
            let rings = polygon.as_array()
                .ok_or_else(|| anyhow!("[io::geojson] Invalid MultiPolygon: polygon must be an array of rings"))?;
            parse_polygon_coords(rings)
        })
        .collect::<Result<Vec<_>>>()
        .map(MultiPolygon)
}

/// Parse Polygon coordinates: `[exterior, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array()
            .ok_or_else(|| anyhow!("[io::geojson] Invalid Polygon: ring must be an array of positions"))?;
        parse_ring_coords(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("[io::geojson] Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring `[[x, y], ...]`, closing it if needed.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|position| {
            let position = position.as_array()
                .ok_or_else(|| anyhow!("[io::geojson] Invalid position: expected [x, y]"))?;
            parse_position(position)
        })
        .collect::<Result<Vec<_>>>()?;

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }
    Ok(LineString(points))
}

/// Parse a position `[x, y, ...]`; extra ordinates are ignored.
fn parse_position(position: &[Value]) -> Result<Coord<f64>> {
    ensure!(position.len() >= 2, "[io::geojson] Invalid position: need at least 2 ordinates, got {}", position.len());
    let x = position[0].as_f64().ok_or_else(|| anyhow!("[io::geojson] Invalid coordinate: x must be a number"))?;
    let y = position[1].as_f64().ok_or_else(|| anyhow!("[io::geojson] Invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

/// GeoJSON MultiPolygon geometry object.
pub(crate) fn multipolygon_json(shape: &MultiPolygon<f64>) -> Value {
    let ring = |ring: &LineString<f64>| ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>();
    let polygons = shape.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()).map(&ring).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

/// GeoJSON Point geometry object.
pub(crate) fn point_json(point: &Point<f64>) -> Value {
    json!({ "type": "Point", "coordinates": [point.x(), point.y()] })
}

pub(crate) fn feature(geometry: Value, properties: Map<String, Value>) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}

pub(crate) fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// A finite number as JSON, or null. JSON has no NaN or infinity.
pub(crate) fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Numeric value of a JSON number or numeric string.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Write a GeoJSON value to `path`, creating parent directories.
pub(crate) fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("[io::geojson] Failed to create directory: {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec(value).context("[io::geojson] Failed to serialize GeoJSON")?;
    std::fs::write(path, bytes)
        .with_context(|| format!("[io::geojson] Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    #[test]
    fn rejects_non_collections() {
        let err = parse_features(br#"{"type": "Feature", "geometry": null}"#).unwrap_err();
        assert!(err.to_string().contains("Expected a FeatureCollection"));
        assert!(parse_features(br#"{"type": "FeatureCollection"}"#).is_err());
        assert!(parse_features(br#"{"type": "FeatureCollection", "features": {}}"#).is_err());
        assert!(parse_features(b"[1, 2").is_err());
    }

    #[test]
    fn empty_collection_is_fine() {
        assert!(parse_features(br#"{"type": "FeatureCollection", "features": []}"#).unwrap().is_empty());
    }

    #[test]
    fn polygon_rings_are_closed() {
        let feature = json!({ "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1]]] } });
        let FeatureGeometry::Polygonal(shape) = parse_geometry(&feature).unwrap() else { panic!("expected polygon") };
        assert_eq!(shape.0[0].exterior().0.len(), 4);
    }

    #[test]
    fn multipolygon_with_hole_survives_writing() {
        let shape: MultiPolygon<f64> = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 0.0, y: 4.0), (x: 4.0, y: 4.0), (x: 4.0, y: 0.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 1.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 1.0)]],
        ).into();
        let feature = json!({ "geometry": multipolygon_json(&shape) });
        assert_eq!(parse_geometry(&feature).unwrap(), FeatureGeometry::Polygonal(shape));
    }

    #[test]
    fn other_geometries_are_reported_by_name() {
        let line = json!({ "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] } });
        assert_eq!(parse_geometry(&line).unwrap(), FeatureGeometry::Other("LineString".into()));
        assert_eq!(parse_geometry(&json!({ "geometry": null })).unwrap(), FeatureGeometry::Null);
        assert_eq!(parse_geometry(&json!({ "geometry": point_json(&Point::new(1.5, 2.0)) })).unwrap(),
            FeatureGeometry::Point(Point::new(1.5, 2.0)));
    }

    #[test]
    fn bad_coordinates_are_errors() {
        let feature = json!({ "geometry": { "type": "Point", "coordinates": ["a", 1] } });
        assert!(parse_geometry(&feature).is_err());
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(as_number(&json!("41.5")), Some(41.5));
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(number(f64::NAN), Value::Null);
    }
}
