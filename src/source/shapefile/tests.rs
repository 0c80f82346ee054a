//! Tests for the shapefile reader

extern crate std;

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use super::*;

/// Builds an in-memory polygon shapefile from records of parts
pub fn build_shapefile(records: &[Vec<Vec<(f64, f64)>>]) -> Vec<u8> {
    let typed: Vec<(i32, Vec<Vec<(f64, f64)>>)> = records.iter()
        .map(|parts| (shape_types::POLYGON, parts.clone()))
        .collect();
    build_typed_shapefile(&typed)
}

/// Builds a shapefile whose records each carry their own polygon shape type
///
/// PolygonZ records get a Z range and Z values plus an M range and M values;
/// PolygonM records get only the M block.
pub fn build_typed_shapefile(records: &[(i32, Vec<Vec<(f64, f64)>>)]) -> Vec<u8> {
    let mut body = Vec::new();

    for (index, (shape_type, parts)) in records.iter().enumerate() {
        let num_points: usize = parts.iter().map(Vec::len).sum();
        let measure_bytes = 16 + 8 * num_points;
        let extra_bytes = match *shape_type {
            shape_types::POLYGON_Z => 2 * measure_bytes,
            shape_types::POLYGON_M => measure_bytes,
            _ => 0,
        };
        let content_bytes = 44 + 4 * parts.len() + 16 * num_points + extra_bytes;

        body.write_i32::<BigEndian>(index as i32 + 1).unwrap();
        body.write_i32::<BigEndian>((content_bytes / 2) as i32).unwrap();
        body.write_i32::<LittleEndian>(*shape_type).unwrap();
        for _ in 0..4 {
            body.write_f64::<LittleEndian>(0.0).unwrap();
        }
        body.write_i32::<LittleEndian>(parts.len() as i32).unwrap();
        body.write_i32::<LittleEndian>(num_points as i32).unwrap();

        let mut start = 0;
        for part in parts {
            body.write_i32::<LittleEndian>(start as i32).unwrap();
            start += part.len();
        }
        for part in parts {
            for &(x, y) in part {
                body.write_f64::<LittleEndian>(x).unwrap();
                body.write_f64::<LittleEndian>(y).unwrap();
            }
        }
        // Range then per-point values; large values make misreads show up as wrong vertices
        for _ in 0..extra_bytes / 8 {
            body.write_f64::<LittleEndian>(9999.0).unwrap();
        }
    }

    let mut file = Vec::new();
    file.write_i32::<BigEndian>(FILE_CODE).unwrap();
    for _ in 0..5 {
        file.write_i32::<BigEndian>(0).unwrap();
    }
    file.write_i32::<BigEndian>(((HEADER_SIZE as usize + body.len()) / 2) as i32).unwrap();
    file.write_i32::<LittleEndian>(VERSION).unwrap();
    file.write_i32::<LittleEndian>(shape_types::POLYGON).unwrap();
    for _ in 0..8 {
        file.write_f64::<LittleEndian>(0.0).unwrap();
    }
    file.extend_from_slice(&body);
    file
}

fn square(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
    vec![(x0, y0), (x0, y0 + size), (x0 + size, y0 + size), (x0 + size, y0), (x0, y0)]
}

#[test]
fn test_read_single_polygon() {
    let data = build_shapefile(&[vec![square(0.0, 0.0, 10.0)]]);
    let polygons = read_polygons(&mut Cursor::new(data)).unwrap();
    std::assert_eq!(polygons.len(), 1);
    std::assert_eq!(polygons[0].len(), 5);
    std::assert!(polygons[0].contains(&Point::new(5.0, 5.0)));
}

#[test]
fn test_each_part_becomes_a_ring() {
    let data = build_shapefile(&[
        vec![square(0.0, 0.0, 10.0), square(20.0, 0.0, 5.0)],
        vec![square(100.0, 100.0, 1.0)],
    ]);
    let polygons = read_polygons(&mut Cursor::new(data)).unwrap();
    std::assert_eq!(polygons.len(), 3);
    std::assert!(polygons[1].contains(&Point::new(22.0, 2.0)));
    std::assert!(polygons[2].contains(&Point::new(100.5, 100.5)));
}

#[test]
fn test_polygon_z_and_m_records() {
    let data = build_typed_shapefile(&[
        (shape_types::POLYGON_Z, vec![square(0.0, 0.0, 10.0)]),
        (shape_types::POLYGON, vec![square(20.0, 0.0, 5.0)]),
        (shape_types::POLYGON_M, vec![square(40.0, 0.0, 2.0)]),
        (shape_types::POLYGON, vec![square(60.0, 0.0, 1.0)]),
    ]);
    let polygons = read_polygons(&mut Cursor::new(data)).unwrap();
    std::assert_eq!(polygons.len(), 4);

    let expected = [square(0.0, 0.0, 10.0), square(20.0, 0.0, 5.0), square(40.0, 0.0, 2.0), square(60.0, 0.0, 1.0)];
    for (polygon, ring) in polygons.iter().zip(expected.iter()) {
        let vertices: Vec<(f64, f64)> = polygon.vertices().iter().map(|p| (p.x, p.y)).collect();
        std::assert_eq!(&vertices, ring);
    }
}

#[test]
fn test_null_shapes_are_skipped() {
    let mut data = build_shapefile(&[vec![square(0.0, 0.0, 10.0)]]);
    // Append a null record: header plus a 4-byte shape type
    data.write_i32::<BigEndian>(2).unwrap();
    data.write_i32::<BigEndian>(2).unwrap();
    data.write_i32::<LittleEndian>(shape_types::NULL).unwrap();
    let length_words = (data.len() / 2) as i32;
    (&mut data[24..28]).write_i32::<BigEndian>(length_words).unwrap();

    let polygons = read_polygons(&mut Cursor::new(data)).unwrap();
    std::assert_eq!(polygons.len(), 1);
}

#[test]
fn test_bad_file_code() {
    let mut data = build_shapefile(&[vec![square(0.0, 0.0, 10.0)]]);
    (&mut data[0..4]).write_i32::<BigEndian>(1234).unwrap();
    let result = read_polygons(&mut Cursor::new(data));
    std::assert!(std::matches!(result, Err(GeoFenceError::GeometrySourceError(_))));
}

#[test]
fn test_truncated_file() {
    let mut data = build_shapefile(&[vec![square(0.0, 0.0, 10.0)]]);
    data.truncate(data.len() - 20);
    let result = read_polygons(&mut Cursor::new(data));
    std::assert!(std::matches!(result, Err(GeoFenceError::GeometrySourceError(_))));
}

#[test]
fn test_unsupported_shape_type() {
    let mut data = build_shapefile(&[vec![square(0.0, 0.0, 10.0)]]);
    // First record's shape type sits right after its 8-byte header
    (&mut data[108..112]).write_i32::<LittleEndian>(1).unwrap();
    let result = read_polygons(&mut Cursor::new(data));
    std::assert!(std::matches!(result, Err(GeoFenceError::GeometrySourceError(_))));
}

#[test]
fn test_missing_file_is_a_geometry_error() {
    let source = ShapefileSource::new("/nonexistent/boroughs.shp");
    std::assert!(std::matches!(source.load_polygons(), Err(GeoFenceError::GeometrySourceError(_))));
    std::assert_eq!(source.prj_path(), std::path::PathBuf::from("/nonexistent/boroughs.prj"));
    std::assert!(source.projection().unwrap().is_none());
}
