//! Geometry sources supplying region polygons
//!
//! The containment engine only needs ordered vertex rings; this module
//! reads them from shapefiles and GeoJSON behind the `GeometrySource`
//! trait.

mod geometry_source;
pub mod shapefile;
pub mod geojson;

use std::path::Path;

use crate::errors::{GeoFenceError, GeoFenceResult};

pub use self::geometry_source::{load_region, GeometrySource, SourceGeometry};
pub use self::shapefile::ShapefileSource;
pub use self::geojson::GeoJsonSource;

/// Open a geometry source, choosing the reader by file extension
pub fn open_geometry_source<P: AsRef<Path>>(path: P) -> GeoFenceResult<Box<dyn GeometrySource>> {
    let path = path.as_ref();
    let extension = path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "shp" => Ok(Box::new(ShapefileSource::new(path))),
        "geojson" | "json" => Ok(Box::new(GeoJsonSource::new(path))),
        _ => Err(GeoFenceError::GeometrySourceError(format!(
            "Unsupported geometry file {} (expected .shp or .geojson)", path.display()
        ))),
    }
}
