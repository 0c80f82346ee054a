use std::fmt;
use log::{debug, info, warn};

use crate::coordinate::{CoordinateSystem, CoordinateSystemFactory, CoordinateTransformer, Point, Reprojector};
use crate::errors::{GeoFenceError, GeoFenceResult};
use crate::filter::{FilterSettings, FilterSummary, GeoFenceConfig, GeoFilter};
use crate::geometry::Region;
use crate::source::{load_region, open_geometry_source, GeometrySource};

/// Where a single coordinate falls relative to the region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateReport {
    /// The queried coordinate, longitude in `x` and latitude in `y`
    pub location: Point,
    /// The coordinate in the region's coordinate system
    pub planar: Point,
    /// Whether the coordinate passes the coarse geographic pre-filter
    pub in_coarse_bounds: bool,
    /// Index of the first polygon containing the planar position
    pub polygon: Option<usize>,
}

impl LocateReport {
    /// Whether a record at this coordinate would be retained by a filter run
    pub fn retained(&self) -> bool {
        self.in_coarse_bounds && self.polygon.is_some()
    }
}

impl fmt::Display for LocateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Location: lon {}, lat {}", self.location.x, self.location.y)?;
        writeln!(f, "  Planar position: ({:.3}, {:.3})", self.planar.x, self.planar.y)?;
        writeln!(f, "  Inside coarse bounds: {}", if self.in_coarse_bounds { "yes" } else { "no" })?;
        match self.polygon {
            Some(index) => writeln!(f, "  Containing polygon: #{}", index)?,
            None => writeln!(f, "  Containing polygon: none")?,
        }
        write!(f, "  Retained: {}", if self.retained() { "yes" } else { "no" })
    }
}

/// Main interface to the geofence library
pub struct GeoFence {
    config: GeoFenceConfig,
}

impl GeoFence {
    /// Create a GeoFence instance for a run configuration
    pub fn new(config: GeoFenceConfig) -> Self {
        GeoFence { config }
    }

    pub fn config(&self) -> &GeoFenceConfig {
        &self.config
    }

    /// Open the configured geometry file
    pub fn open_source(&self) -> GeoFenceResult<Box<dyn GeometrySource>> {
        open_geometry_source(self.config.geometry_path()?)
    }

    /// Coordinate system of the region
    ///
    /// The configured target wins; otherwise the definition stored with the
    /// geometry (such as a shapefile's `.prj`) is used.
    pub fn resolve_target_crs(&self, stored: Option<&str>, origin: &str) -> GeoFenceResult<CoordinateSystem> {
        if let Some(target) = self.config.target_coordinate_system()? {
            return Ok(target);
        }

        match stored {
            Some(definition) => {
                info!("Using coordinate system stored with {}", origin);
                CoordinateSystemFactory::from_string(definition)
            },
            None => Err(GeoFenceError::ConfigError(format!(
                "No target coordinate system configured and none stored with {}", origin
            ))),
        }
    }

    /// Load the region and assemble a filter with the coordinate transformer
    pub fn build_filter(&self) -> GeoFenceResult<GeoFilter> {
        self.build_filter_with(Box::new(CoordinateTransformer::new()))
    }

    /// Load the region and assemble a filter with the given reprojector
    pub fn build_filter_with(&self, reprojector: Box<dyn Reprojector>) -> GeoFenceResult<GeoFilter> {
        let source = self.open_source()?;
        let (region, projection) = load_region(source.as_ref())?;
        let target_crs = self.resolve_target_crs(projection.as_deref(), &source.describe())?;
        if region.is_empty() {
            warn!("{} contains no polygons; no record will be retained", source.describe());
        }

        let settings = FilterSettings {
            source_crs: self.config.source_coordinate_system()?,
            target_crs,
            coarse_bounds: self.config.coarse_bounds,
        };
        debug!("Source CRS: {}", settings.source_crs.description());
        debug!("Target CRS: {}", settings.target_crs.description());

        Ok(GeoFilter::new(region, settings, reprojector))
    }

    /// Filter the configured input file into the configured output file
    pub fn filter(&self) -> GeoFenceResult<FilterSummary> {
        let input = self.config.input_path()?;
        let output = self.config.output_path()?;
        let filter = self.build_filter()?;
        filter.run(input, output, self.config.delimiter)
    }

    /// Describe the configured region geometry
    pub fn inspect(&self) -> GeoFenceResult<String> {
        let source = self.open_source()?;
        let (region, projection) = load_region(source.as_ref())?;
        let target_crs = self.resolve_target_crs(projection.as_deref(), &source.describe())?;

        let mut result = format!("Geometry: {}\n", source.describe());
        result.push_str(&format!("  Coordinate system: {}\n", target_crs.description()));
        result.push_str(&format!("  Number of polygons: {}\n", region.len()));
        result.push_str(&format!("  Total vertices: {}\n", region.vertex_count()));

        for (i, polygon) in region.polygons().iter().enumerate() {
            match polygon.bounds() {
                Some(bounds) => result.push_str(&format!(
                    "\nPolygon #{}\n  Vertices: {}\n  Bounds: {}\n", i, polygon.len(), bounds
                )),
                None => result.push_str(&format!("\nPolygon #{}\n  Vertices: 0\n", i)),
            }
        }

        result.push_str(&self.describe_extent(&region, &target_crs)?);
        Ok(result)
    }

    /// Region bounds in planar units, plus geographic degrees when invertible
    fn describe_extent(&self, region: &Region, target_crs: &CoordinateSystem) -> GeoFenceResult<String> {
        let bounds = match region.bounds() {
            Some(bounds) => bounds,
            None => return Ok("\nRegion bounds: none\n".to_string()),
        };

        let mut result = format!("\nRegion bounds: {}\n", bounds);
        let source_crs = self.config.source_coordinate_system()?;
        let transformer = CoordinateTransformer::new();
        match transformer.transform_bbox(&bounds, target_crs, &source_crs) {
            Ok(extent) => result.push_str(&format!("Geographic extent: {}\n", extent)),
            Err(e) => debug!("Region extent cannot be expressed in degrees: {}", e),
        }
        Ok(result)
    }

    /// Report where a longitude/latitude falls relative to the region
    pub fn locate(&self, lon: f64, lat: f64) -> GeoFenceResult<LocateReport> {
        let filter = self.build_filter()?;
        locate_with(&filter, lon, lat)
    }
}

/// Run a single coordinate through the stages of an assembled filter
pub fn locate_with(filter: &GeoFilter, lon: f64, lat: f64) -> GeoFenceResult<LocateReport> {
    let location = Point::from_lon_lat(lon, lat);
    let record = crate::records::Record::new(0, lat, lon);
    let planar = filter.reproject(&record)?;

    Ok(LocateReport {
        location,
        planar,
        in_coarse_bounds: filter.in_coarse_bounds(&record),
        polygon: filter.region().find(&planar),
    })
}
