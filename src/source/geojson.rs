//! GeoJSON polygon reader
//!
//! Accepts a FeatureCollection, a single Feature or a bare geometry.
//! Exterior rings of Polygon and MultiPolygon geometries become region
//! polygons; interior rings are dropped. Coordinates are taken as planar
//! values in the region's coordinate system.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use serde_json::Value;

use crate::coordinate::Point;
use crate::errors::{GeoFenceError, GeoFenceResult};
use crate::geometry::Polygon;
use super::geometry_source::{GeometrySource, SourceGeometry};

fn invalid(msg: String) -> GeoFenceError {
    GeoFenceError::GeometrySourceError(msg)
}

fn parse_position(value: &Value) -> GeoFenceResult<Point> {
    let coords = value.as_array()
        .filter(|coords| coords.len() >= 2)
        .ok_or_else(|| invalid(format!("Invalid GeoJSON position: {}", value)))?;
    match (coords[0].as_f64(), coords[1].as_f64()) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => Err(invalid(format!("Non-numeric GeoJSON position: {}", value))),
    }
}

fn parse_ring(value: &Value) -> GeoFenceResult<Polygon> {
    let positions = value.as_array()
        .ok_or_else(|| invalid("GeoJSON ring is not an array".to_string()))?;
    let vertices = positions.iter()
        .map(parse_position)
        .collect::<GeoFenceResult<Vec<Point>>>()?;
    Ok(Polygon::new(vertices))
}

/// Exterior ring of a Polygon coordinate array
fn parse_polygon_coordinates(value: &Value, polygons: &mut Vec<Polygon>) -> GeoFenceResult<()> {
    let rings = value.as_array()
        .ok_or_else(|| invalid("GeoJSON polygon coordinates are not an array".to_string()))?;
    if let Some(exterior) = rings.first() {
        polygons.push(parse_ring(exterior)?);
    }
    if rings.len() > 1 {
        warn!("Ignoring {} interior ring(s)", rings.len() - 1);
    }
    Ok(())
}

fn collect_geometry(geometry: &Value, polygons: &mut Vec<Polygon>) -> GeoFenceResult<()> {
    if geometry.is_null() {
        debug!("Skipping feature without geometry");
        return Ok(());
    }

    let kind = geometry.get("type").and_then(Value::as_str)
        .ok_or_else(|| invalid("GeoJSON geometry has no type".to_string()))?;

    match kind {
        "Polygon" => {
            let coordinates = geometry.get("coordinates")
                .ok_or_else(|| invalid("Polygon has no coordinates".to_string()))?;
            parse_polygon_coordinates(coordinates, polygons)
        },
        "MultiPolygon" => {
            let members = geometry.get("coordinates").and_then(Value::as_array)
                .ok_or_else(|| invalid("MultiPolygon has no coordinates".to_string()))?;
            for member in members {
                parse_polygon_coordinates(member, polygons)?;
            }
            Ok(())
        },
        "GeometryCollection" => {
            let members = geometry.get("geometries").and_then(Value::as_array)
                .ok_or_else(|| invalid("GeometryCollection has no geometries".to_string()))?;
            for member in members {
                collect_geometry(member, polygons)?;
            }
            Ok(())
        },
        other => {
            warn!("Skipping non-polygon geometry {}", other);
            Ok(())
        },
    }
}

/// Extract every polygon ring from a parsed GeoJSON document
pub fn parse_polygons(document: &Value) -> GeoFenceResult<Vec<Polygon>> {
    let mut polygons = Vec::new();

    match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = document.get("features").and_then(Value::as_array)
                .ok_or_else(|| invalid("FeatureCollection has no features".to_string()))?;
            for feature in features {
                collect_geometry(feature.get("geometry").unwrap_or(&Value::Null), &mut polygons)?;
            }
        },
        Some("Feature") => {
            collect_geometry(document.get("geometry").unwrap_or(&Value::Null), &mut polygons)?;
        },
        Some(_) => collect_geometry(document, &mut polygons)?,
        None => return Err(invalid("GeoJSON document has no type".to_string())),
    }

    Ok(polygons)
}

/// Named CRS member of a GeoJSON document, as "EPSG:nnnn"
///
/// Only the legacy `{"type": "name", "properties": {"name": ...}}` form
/// with an EPSG code is understood.
pub fn parse_crs_name(document: &Value) -> Option<String> {
    let name = document.get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;
    let code: String = name.chars().rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if code.is_empty() || !name.to_uppercase().contains("EPSG") {
        return None;
    }
    Some(format!("EPSG:{}", code))
}

/// Polygons stored in a GeoJSON file
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    path: PathBuf,
}

impl GeoJsonSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        GeoJsonSource { path: path.as_ref().to_path_buf() }
    }

    fn read_document(&self) -> GeoFenceResult<Value> {
        let file = File::open(&self.path).map_err(|e| {
            invalid(format!("Cannot open GeoJSON {}: {}", self.path.display(), e))
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| invalid(format!("Invalid GeoJSON in {}: {}", self.path.display(), e)))
    }
}

impl GeometrySource for GeoJsonSource {
    fn load_polygons(&self) -> GeoFenceResult<Vec<Polygon>> {
        let polygons = parse_polygons(&self.read_document()?)?;
        info!("Read {} polygon rings from {}", polygons.len(), self.path.display());
        Ok(polygons)
    }

    fn projection(&self) -> GeoFenceResult<Option<String>> {
        Ok(parse_crs_name(&self.read_document()?))
    }

    fn load(&self) -> GeoFenceResult<SourceGeometry> {
        let document = self.read_document()?;
        let polygons = parse_polygons(&document)?;
        info!("Read {} polygon rings from {}", polygons.len(), self.path.display());
        Ok(SourceGeometry {
            polygons,
            projection: parse_crs_name(&document),
        })
    }

    fn describe(&self) -> String {
        format!("GeoJSON {}", self.path.display())
    }
}
