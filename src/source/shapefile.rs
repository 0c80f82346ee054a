//! ESRI shapefile polygon reader
//!
//! Reads the main `.shp` file directly. File and record headers are
//! big-endian, record contents little-endian. Every part of a polygon
//! record becomes its own ring; null shapes are skipped.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::coordinate::Point;
use crate::errors::{GeoFenceError, GeoFenceResult};
use crate::geometry::Polygon;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::SeekableReader;
use super::geometry_source::GeometrySource;

/// Magic number at the start of every shapefile
pub const FILE_CODE: i32 = 9994;
/// Shapefile format version
pub const VERSION: i32 = 1000;
/// Size of the main file header in bytes
pub const HEADER_SIZE: u64 = 100;

/// Shape type codes handled by the reader
pub mod shape_types {
    pub const NULL: i32 = 0;
    pub const POLYGON: i32 = 5;
    pub const POLYGON_Z: i32 = 15;
    pub const POLYGON_M: i32 = 25;
}

fn corrupt(msg: String) -> GeoFenceError {
    GeoFenceError::GeometrySourceError(msg)
}

/// Header fields needed to walk the records
#[derive(Debug, Clone, Copy)]
pub struct ShapefileHeader {
    /// Total file length in bytes
    pub file_length: u64,
    /// Shape type declared for the whole file
    pub shape_type: i32,
}

/// Read and validate the 100-byte main file header
pub fn read_header(reader: &mut dyn SeekableReader) -> GeoFenceResult<ShapefileHeader> {
    let big = ByteOrder::BigEndian.create_handler();
    let little = ByteOrder::LittleEndian.create_handler();

    reader.seek(SeekFrom::Start(0))?;
    let file_code = big.read_i32(reader)?;
    if file_code != FILE_CODE {
        return Err(corrupt(format!("Not a shapefile: file code {} (expected {})", file_code, FILE_CODE)));
    }

    reader.seek(SeekFrom::Start(24))?;
    let length_words = big.read_i32(reader)?;
    if length_words < (HEADER_SIZE / 2) as i32 {
        return Err(corrupt(format!("Invalid shapefile length: {} words", length_words)));
    }

    let version = little.read_i32(reader)?;
    if version != VERSION {
        warn!("Unexpected shapefile version {}", version);
    }
    let shape_type = little.read_i32(reader)?;

    Ok(ShapefileHeader {
        file_length: length_words as u64 * 2,
        shape_type,
    })
}

/// Read one polygon record's rings
///
/// The reader must be positioned just after the record's shape type.
fn read_polygon_rings(reader: &mut dyn SeekableReader,
                      handler: &dyn ByteOrderHandler,
                      record_number: i32,
                      content_bytes: u64) -> GeoFenceResult<Vec<Polygon>> {
    // Skip the record bounding box
    reader.seek(SeekFrom::Current(32))?;

    let num_parts = handler.read_i32(reader)?;
    let num_points = handler.read_i32(reader)?;
    if num_parts < 0 || num_points < 0 || num_parts > num_points {
        return Err(corrupt(format!(
            "Record {} has invalid part/point counts ({}, {})", record_number, num_parts, num_points)));
    }

    let num_parts = num_parts as usize;
    let num_points = num_points as usize;
    let required = 44 + 4 * num_parts as u64 + 16 * num_points as u64;
    if required > content_bytes {
        return Err(corrupt(format!(
            "Record {} declares {} points but only has {} bytes", record_number, num_points, content_bytes)));
    }

    let mut starts = Vec::with_capacity(num_parts);
    for _ in 0..num_parts {
        starts.push(handler.read_i32(reader)?);
    }

    let mut points = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let (x, y) = handler.read_xy(reader)?;
        points.push(Point::new(x, y));
    }

    let mut rings = Vec::with_capacity(num_parts);
    for (i, &start) in starts.iter().enumerate() {
        let end = match starts.get(i + 1) {
            Some(&next) => next,
            None => num_points as i32,
        };
        if start < 0 || start > end || end as usize > num_points {
            return Err(corrupt(format!(
                "Record {} has invalid part range {}..{}", record_number, start, end)));
        }
        rings.push(Polygon::new(points[start as usize..end as usize].to_vec()));
    }

    Ok(rings)
}

/// Read every polygon ring from shapefile data
pub fn read_polygons(reader: &mut dyn SeekableReader) -> GeoFenceResult<Vec<Polygon>> {
    read_polygons_inner(reader).map_err(|e| match e {
        GeoFenceError::IoError(io) if io.kind() == ErrorKind::UnexpectedEof => {
            corrupt("Shapefile is truncated".to_string())
        },
        other => other,
    })
}

fn read_polygons_inner(reader: &mut dyn SeekableReader) -> GeoFenceResult<Vec<Polygon>> {
    let header = read_header(reader)?;
    debug!("Shapefile header: {:?}", header);

    let big = ByteOrder::BigEndian.create_handler();
    let little = ByteOrder::LittleEndian.create_handler();

    let mut polygons = Vec::new();
    let mut position = HEADER_SIZE;

    while position + 8 <= header.file_length {
        reader.seek(SeekFrom::Start(position))?;
        let record_number = big.read_i32(reader)?;
        let content_words = big.read_i32(reader)?;
        if content_words < 2 {
            return Err(corrupt(format!("Record {} has invalid length {}", record_number, content_words)));
        }
        let content_bytes = content_words as u64 * 2;

        let shape_type = little.read_i32(reader)?;
        match shape_type {
            shape_types::NULL => debug!("Skipping null shape in record {}", record_number),
            shape_types::POLYGON | shape_types::POLYGON_Z | shape_types::POLYGON_M => {
                let rings = read_polygon_rings(reader, little.as_ref(), record_number, content_bytes)?;
                debug!("Record {} has {} rings", record_number, rings.len());
                polygons.extend(rings);
            },
            other => {
                return Err(corrupt(format!(
                    "Record {} has unsupported shape type {}", record_number, other)));
            },
        }

        position += 8 + content_bytes;
    }

    Ok(polygons)
}

/// Polygons stored in an ESRI shapefile
#[derive(Debug, Clone)]
pub struct ShapefileSource {
    path: PathBuf,
}

impl ShapefileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ShapefileSource { path: path.as_ref().to_path_buf() }
    }

    /// Path of the `.prj` sidecar holding the projection WKT
    pub fn prj_path(&self) -> PathBuf {
        self.path.with_extension("prj")
    }
}

impl GeometrySource for ShapefileSource {
    fn load_polygons(&self) -> GeoFenceResult<Vec<Polygon>> {
        let file = File::open(&self.path).map_err(|e| {
            corrupt(format!("Cannot open shapefile {}: {}", self.path.display(), e))
        })?;
        let mut reader = BufReader::new(file);
        let polygons = read_polygons(&mut reader)?;
        info!("Read {} polygon rings from {}", polygons.len(), self.path.display());
        Ok(polygons)
    }

    fn projection(&self) -> GeoFenceResult<Option<String>> {
        let prj = self.prj_path();
        if !prj.exists() {
            debug!("No projection sidecar at {}", prj.display());
            return Ok(None);
        }
        let wkt = fs::read_to_string(&prj)?;
        Ok(Some(wkt.trim().to_string()))
    }

    fn describe(&self) -> String {
        format!("shapefile {}", self.path.display())
    }
}

#[cfg(test)]
mod tests;
