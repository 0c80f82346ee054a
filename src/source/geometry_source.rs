//! Geometry source interface
//!
//! A geometry source supplies the polygons of a region as planar vertex
//! rings, with ring order and winding preserved as stored.

use log::info;

use crate::errors::GeoFenceResult;
use crate::geometry::{Polygon, Region};

/// Polygons read from a source together with its stored coordinate system
#[derive(Debug, Clone, Default)]
pub struct SourceGeometry {
    pub polygons: Vec<Polygon>,
    /// WKT or `EPSG:nnnn` definition stored with the geometry
    pub projection: Option<String>,
}

/// Supplies region polygons from some storage format
pub trait GeometrySource {
    /// Read every polygon ring from the source
    fn load_polygons(&self) -> GeoFenceResult<Vec<Polygon>>;

    /// Coordinate system definition stored alongside the geometry, if any
    ///
    /// Returns WKT or an `EPSG:nnnn` string understood by
    /// `CoordinateSystemFactory::from_string`.
    fn projection(&self) -> GeoFenceResult<Option<String>> {
        Ok(None)
    }

    /// Read the polygons and the stored coordinate system in one pass
    fn load(&self) -> GeoFenceResult<SourceGeometry> {
        Ok(SourceGeometry {
            polygons: self.load_polygons()?,
            projection: self.projection()?,
        })
    }

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Load a region and its stored coordinate system from a geometry source
pub fn load_region(source: &dyn GeometrySource) -> GeoFenceResult<(Region, Option<String>)> {
    let geometry = source.load()?;
    let region = Region::new(geometry.polygons);
    info!("Loaded {} polygons ({} vertices) from {}",
          region.len(), region.vertex_count(), source.describe());
    Ok((region, geometry.projection))
}
