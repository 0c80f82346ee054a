//! Integration tests for the geofence pipeline

extern crate std;

use std::fs;
use std::path::Path;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use geofence::coordinate::Ellipsoid;
use geofence::{
    BoundingBox, CoordinateSystem, FilterSettings, GeoFence, GeoFenceConfig, GeoFenceError,
    GeoFenceResult, GeoFilter, Point, Polygon, Region, Reprojector,
};

const NY_LONG_ISLAND_WKT: &str = "PROJCS[\"NAD_1983_StatePlane_New_York_Long_Island_FIPS_3104_Feet\",GEOGCS[\"GCS_North_American_1983\",DATUM[\"D_North_American_1983\",SPHEROID[\"GRS_1980\",6378137.0,298.257222101]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Lambert_Conformal_Conic\"],PARAMETER[\"False_Easting\",984250.0],PARAMETER[\"False_Northing\",0.0],PARAMETER[\"Central_Meridian\",-74.0],PARAMETER[\"Standard_Parallel_1\",40.66666666666666],PARAMETER[\"Standard_Parallel_2\",41.03333333333333],PARAMETER[\"Latitude_Of_Origin\",40.16666666666666],UNIT[\"Foot_US\",0.3048006096012192]]";

/// Square around Midtown Manhattan in New York Long Island state plane feet
const MIDTOWN_SQUARE: [(f64, f64); 5] = [
    (980000.0, 200000.0),
    (980000.0, 230000.0),
    (1000000.0, 230000.0),
    (1000000.0, 200000.0),
    (980000.0, 200000.0),
];

const RECORDS: &str = "1,40.758,-73.985\n2,40.65,-73.95\n3,40.75,-73.99\n4,39.5,-74.0\n";

/// Maps degrees onto a plane by scaling them by 100
struct ScalingReprojector;

impl Reprojector for ScalingReprojector {
    fn reproject(&self, point: &Point, _from: &CoordinateSystem, _to: &CoordinateSystem) -> GeoFenceResult<Point> {
        Ok(Point::new(point.x * 100.0, point.y * 100.0))
    }
}

fn stub_filter() -> GeoFilter {
    let square = Polygon::from(vec![
        (-7450.0, 4050.0),
        (-7450.0, 4100.0),
        (-7350.0, 4100.0),
        (-7350.0, 4050.0),
    ]);
    let settings = FilterSettings {
        source_crs: CoordinateSystem::Geographic(Ellipsoid::GRS80),
        target_crs: CoordinateSystem::Geographic(Ellipsoid::GRS80),
        coarse_bounds: BoundingBox::new(-75.0, 40.0, -70.0, 42.0),
    };
    GeoFilter::new(Region::new(vec![square]), settings, Box::new(ScalingReprojector))
}

fn write_shapefile(path: &Path, ring: &[(f64, f64)]) {
    let content_bytes = 44 + 4 + 16 * ring.len();

    let mut file = Vec::new();
    file.write_i32::<BigEndian>(9994).unwrap();
    for _ in 0..5 {
        file.write_i32::<BigEndian>(0).unwrap();
    }
    file.write_i32::<BigEndian>(((100 + 8 + content_bytes) / 2) as i32).unwrap();
    file.write_i32::<LittleEndian>(1000).unwrap();
    file.write_i32::<LittleEndian>(5).unwrap();
    for _ in 0..8 {
        file.write_f64::<LittleEndian>(0.0).unwrap();
    }

    file.write_i32::<BigEndian>(1).unwrap();
    file.write_i32::<BigEndian>((content_bytes / 2) as i32).unwrap();
    file.write_i32::<LittleEndian>(5).unwrap();
    for _ in 0..4 {
        file.write_f64::<LittleEndian>(0.0).unwrap();
    }
    file.write_i32::<LittleEndian>(1).unwrap();
    file.write_i32::<LittleEndian>(ring.len() as i32).unwrap();
    file.write_i32::<LittleEndian>(0).unwrap();
    for &(x, y) in ring {
        file.write_f64::<LittleEndian>(x).unwrap();
        file.write_f64::<LittleEndian>(y).unwrap();
    }

    fs::write(path, file).unwrap();
}

#[test]
fn test_end_to_end_with_stub_reprojector() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("records.csv");
    let output = dir.path().join("retained.csv");
    fs::write(&input, "1,40.7,-74.0\n2,41.9,-71.5\n3,40.9,-73.9\n").unwrap();

    let summary = stub_filter().run(&input, &output, ',').unwrap();
    std::assert_eq!(summary.records_read, 3);
    std::assert_eq!(summary.candidates, 3);
    std::assert_eq!(summary.retained, 2);
    std::assert_eq!(fs::read_to_string(&output).unwrap(), "1,3,\n");
}

#[test]
fn test_runs_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("records.csv");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    fs::write(&input, "3,40.9,-73.9\n2,41.9,-71.5\n1,40.7,-74.0\n").unwrap();

    let filter = stub_filter();
    filter.run(&input, &first, ',').unwrap();
    filter.run(&input, &second, ',').unwrap();

    let first = fs::read_to_string(&first).unwrap();
    std::assert_eq!(first, "3,1,\n");
    std::assert_eq!(first, fs::read_to_string(&second).unwrap());
}

#[test]
fn test_malformed_line_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("records.csv");
    let output = dir.path().join("retained.csv");
    fs::write(&input, "1,40.7,-74.0\nabc,40.0\n").unwrap();

    match stub_filter().run(&input, &output, ',') {
        Err(GeoFenceError::ParseError { line, content, .. }) => {
            std::assert_eq!(line, 2);
            std::assert_eq!(content, "abc,40.0");
        },
        other => std::panic!("expected a parse error, got {:?}", other),
    }
    std::assert!(!output.exists());
}

#[test]
fn test_no_matches_writes_empty_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("records.csv");
    let output = dir.path().join("retained.csv");
    fs::write(&input, "2,41.9,-71.5\n5,45.0,-74.0\n").unwrap();

    let summary = stub_filter().run(&input, &output, ',').unwrap();
    std::assert_eq!(summary.candidates, 1);
    std::assert_eq!(summary.retained, 0);
    std::assert_eq!(fs::read_to_string(&output).unwrap(), "\n");
}

#[test]
fn test_geofence_with_geojson_region() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = dir.path().join("midtown.geojson");
    let input = dir.path().join("records.csv");
    let output = dir.path().join("retained.csv");

    let ring: Vec<[f64; 2]> = MIDTOWN_SQUARE.iter().map(|&(x, y)| [x, y]).collect();
    let document = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "Midtown" },
            "geometry": { "type": "Polygon", "coordinates": [ring] }
        }]
    });
    fs::write(&geometry, document.to_string()).unwrap();
    fs::write(&input, RECORDS).unwrap();

    let mut config = GeoFenceConfig::builtin().unwrap();
    config.input = Some(input);
    config.output = Some(output.clone());
    config.geometry = Some(geometry);

    let geofence = GeoFence::new(config);
    let summary = geofence.filter().unwrap();
    std::assert_eq!(summary.records_read, 4);
    std::assert_eq!(summary.candidates, 3);
    std::assert_eq!(fs::read_to_string(&output).unwrap(), "1,3,\n");

    let report = geofence.locate(-73.985, 40.758).unwrap();
    std::assert!(report.in_coarse_bounds);
    std::assert_eq!(report.polygon, Some(0));
    std::assert!(report.retained());

    let report = geofence.locate(-73.95, 40.65).unwrap();
    std::assert_eq!(report.polygon, None);
}

#[test]
fn test_geofence_reads_shapefile_projection() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = dir.path().join("midtown.shp");
    write_shapefile(&geometry, &MIDTOWN_SQUARE);
    fs::write(dir.path().join("midtown.prj"), NY_LONG_ISLAND_WKT).unwrap();

    let mut config = GeoFenceConfig::builtin().unwrap();
    config.geometry = Some(geometry);
    config.target_crs = None;

    let geofence = GeoFence::new(config);
    let description = geofence.inspect().unwrap();
    std::assert!(description.contains("Number of polygons: 1"));
    std::assert!(description.contains("Lambert Conformal Conic"));
    std::assert!(description.contains("Region bounds: 980000,200000,1000000,230000"));
    std::assert!(description.contains("Geographic extent: "));

    let report = geofence.locate(-73.99, 40.75).unwrap();
    std::assert_eq!(report.polygon, Some(0));
}

#[test]
fn test_missing_projection_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = dir.path().join("midtown.shp");
    write_shapefile(&geometry, &MIDTOWN_SQUARE);

    let mut config = GeoFenceConfig::builtin().unwrap();
    config.geometry = Some(geometry);
    config.target_crs = None;

    let result = GeoFence::new(config).locate(-73.99, 40.75);
    std::assert!(matches!(result, Err(GeoFenceError::ConfigError(_))));
}

#[test]
fn test_missing_geometry_file() {
    let mut config = GeoFenceConfig::builtin().unwrap();
    config.geometry = Some("/nonexistent/region.shp".into());

    let result = GeoFence::new(config).inspect();
    std::assert!(matches!(result, Err(GeoFenceError::GeometrySourceError(_))));
}
