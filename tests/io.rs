// Integration tests for file IO:
//   GeoJSON round trips through every engine boundary and structural input errors.

use std::io::Write;

use greenspace::{
    read_housing, read_park_features, read_rated_parks, read_resolved_parks, read_reviews, write_rated_parks,
    write_resolved_parks, write_scored_housing, Pipeline,
};

const PARKS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "id": "1", "name": null, "leisure": "park" },
          "geometry": { "type": "Polygon", "coordinates": [[[-87.700, 41.900], [-87.700, 41.902], [-87.698, 41.902], [-87.698, 41.900], [-87.700, 41.900]]] } },
        { "type": "Feature", "properties": { "id": "2", "leisure": "park" },
          "geometry": { "type": "Polygon", "coordinates": [[[-87.699, 41.901], [-87.699, 41.903], [-87.697, 41.903], [-87.697, 41.901], [-87.699, 41.901]]] } },
        { "type": "Feature", "properties": { "id": "3", "name": "Humboldt Park", "leisure": "park" },
          "geometry": { "type": "Polygon", "coordinates": [[[-87.710, 41.900], [-87.710, 41.904], [-87.706, 41.904], [-87.706, 41.900], [-87.710, 41.900]]] } }
    ]
}"#;

const REVIEWS: &str = r#"[
    { "name": "Humboldt Park", "latitude": 41.902, "longitude": -87.708, "rating": 4.5, "review_count": 200, "source": "google" },
    { "name": "Playlot", "latitude": 41.9015, "longitude": -87.6985, "rating": 3.0, "review_count": 5, "source": "yelp" }
]"#;

fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn files_flow_through_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let parks_path = write_temp(&dir, "parks.geojson", PARKS);
    let reviews_path = write_temp(&dir, "reviews.json", REVIEWS);
    let housing_path = write_temp(&dir, "housing.csv", "Address,Latitude,Longitude\nA,41.899,-87.701\nB,42.100,-87.500\n");
    let pipeline = Pipeline::default();

    let resolution = pipeline.resolve(read_park_features(&parks_path).unwrap());
    assert_eq!(resolution.parks.len(), 2);
    let resolved_path = dir.path().join("out/resolved.geojson");
    write_resolved_parks(&resolved_path, &resolution.parks).unwrap();

    let resolved = read_resolved_parks(&resolved_path).unwrap();
    assert_eq!(resolved, resolution.parks);

    let rated = pipeline.rate(&resolved, &read_reviews(&reviews_path).unwrap()).unwrap();
    let rated_path = dir.path().join("out/rated.geojson");
    write_rated_parks(&rated_path, &rated).unwrap();
    let reread = read_rated_parks(&rated_path).unwrap();
    assert_eq!(reread.len(), 2);
    assert_eq!(reread[0].display_name(), "Humboldt Park");
    assert_eq!(reread[0].effective_rating, 4.5);
    assert_eq!(reread[1].display_name(), "Playlot");

    let index = pipeline.index(&reread, &read_housing(&housing_path).unwrap()).unwrap();
    let index_path = dir.path().join("out/index.geojson");
    write_scored_housing(&index_path, &index).unwrap();

    let written: serde_json::Value = serde_json::from_slice(&std::fs::read(&index_path).unwrap()).unwrap();
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"]["id"], 1);
    assert_eq!(features[0]["properties"]["park_count"], 2);
    assert_eq!(features[1]["properties"]["park_count"], 0);
}

#[test]
fn non_collections_are_rejected_with_a_description() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "parks.geojson", r#"{ "type": "Feature", "properties": {}, "geometry": null }"#);

    let err = read_park_features(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Expected a FeatureCollection"));
}

#[test]
fn malformed_features_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "parks.geojson", r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "id": "empty" }, "geometry": { "type": "Polygon", "coordinates": [] } },
            { "type": "Feature", "properties": { "id": "ok", "name": "Oz Park" },
              "geometry": { "type": "Polygon", "coordinates": [[[-87.64, 41.92], [-87.64, 41.93], [-87.63, 41.93], [-87.63, 41.92], [-87.64, 41.92]]] } }
        ]
    }"#);

    let parks = read_park_features(&path).unwrap();
    assert_eq!(parks.len(), 1);
    assert_eq!(parks[0].id, "ok");
}

#[test]
fn missing_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_park_features(&dir.path().join("missing.geojson")).is_err());
    assert!(read_housing(&dir.path().join("missing.csv")).is_err());
}
