//! Run configuration
//!
//! Configuration is layered: the built-in `geofence.toml`, then an optional
//! user TOML file, then command-line arguments. Each layer only replaces the
//! keys it sets.

use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use log::{debug, warn};

use crate::coordinate::{BoundingBox, CoordinateSystem, CoordinateSystemFactory};
use crate::errors::{GeoFenceError, GeoFenceResult};

/// Built-in configuration defaults
const DEFAULT_CONFIG: &str = include_str!("../../geofence.toml");

lazy_static! {
    static ref BUILTIN: Result<GeoFenceConfig, String> = {
        let mut config = GeoFenceConfig {
            input: None,
            output: None,
            geometry: None,
            source_crs: "EPSG:4269".to_string(),
            target_crs: None,
            coarse_bounds: BoundingBox::new(-75.0, 40.0, -70.0, 42.0),
            delimiter: ',',
        };
        config.merge_str(DEFAULT_CONFIG)
            .map(|_| config)
            .map_err(|e| e.to_string())
    };
}

fn config_error(msg: String) -> GeoFenceError {
    GeoFenceError::ConfigError(msg)
}

/// Settings for one geofence run
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFenceConfig {
    /// Record file to filter
    pub input: Option<PathBuf>,
    /// Where retained identifiers are written
    pub output: Option<PathBuf>,
    /// Region geometry (.shp or .geojson)
    pub geometry: Option<PathBuf>,
    /// Coordinate system of the record coordinates
    pub source_crs: String,
    /// Coordinate system of the region; `None` defers to the geometry source
    pub target_crs: Option<String>,
    /// Geographic pre-filter box, longitude in x and latitude in y
    pub coarse_bounds: BoundingBox,
    /// Field separator for record input and output
    pub delimiter: char,
}

impl GeoFenceConfig {
    /// The built-in defaults
    pub fn builtin() -> GeoFenceResult<Self> {
        BUILTIN.clone().map_err(config_error)
    }

    /// Built-in defaults overlaid with a TOML string
    pub fn from_str(content: &str) -> GeoFenceResult<Self> {
        let mut config = Self::builtin()?;
        config.merge_str(content)?;
        Ok(config)
    }

    /// Built-in defaults overlaid with a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GeoFenceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Cannot read config {}: {}", path.display(), e)))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_str(&content)
    }

    /// Overlay the keys set in a TOML document onto this configuration
    pub fn merge_str(&mut self, content: &str) -> GeoFenceResult<()> {
        let table: toml::Table = content.parse()
            .map_err(|e| config_error(format!("Failed to parse TOML: {}", e)))?;

        for key in table.keys() {
            if !matches!(key.as_str(), "paths" | "crs" | "coarse_bounds" | "format") {
                warn!("Ignoring unknown configuration section [{}]", key);
            }
        }

        if let Some(paths) = section(&table, "paths")? {
            if let Some(input) = string_value(paths, "paths", "input")? {
                self.input = Some(PathBuf::from(input));
            }
            if let Some(output) = string_value(paths, "paths", "output")? {
                self.output = Some(PathBuf::from(output));
            }
            if let Some(geometry) = string_value(paths, "paths", "geometry")? {
                self.geometry = Some(PathBuf::from(geometry));
            }
        }

        if let Some(crs) = section(&table, "crs")? {
            if let Some(source) = string_value(crs, "crs", "source")? {
                self.source_crs = source;
            }
            if let Some(target) = string_value(crs, "crs", "target")? {
                self.target_crs = Some(target);
            }
        }

        if let Some(bounds) = section(&table, "coarse_bounds")? {
            let mut bbox = self.coarse_bounds;
            if let Some(v) = number_value(bounds, "coarse_bounds", "min_lon")? { bbox.min_x = v; }
            if let Some(v) = number_value(bounds, "coarse_bounds", "max_lon")? { bbox.max_x = v; }
            if let Some(v) = number_value(bounds, "coarse_bounds", "min_lat")? { bbox.min_y = v; }
            if let Some(v) = number_value(bounds, "coarse_bounds", "max_lat")? { bbox.max_y = v; }
            if bbox.min_x > bbox.max_x || bbox.min_y > bbox.max_y {
                return Err(config_error(format!("Coarse bounds minimum exceeds maximum: {}", bbox)));
            }
            self.coarse_bounds = bbox;
        }

        if let Some(format) = section(&table, "format")? {
            if let Some(delimiter) = string_value(format, "format", "delimiter")? {
                self.delimiter = parse_delimiter(&delimiter)?;
            }
        }

        Ok(())
    }

    /// Parsed source coordinate system
    pub fn source_coordinate_system(&self) -> GeoFenceResult<CoordinateSystem> {
        CoordinateSystemFactory::from_string(&self.source_crs)
    }

    /// Parsed target coordinate system, if one is configured
    pub fn target_coordinate_system(&self) -> GeoFenceResult<Option<CoordinateSystem>> {
        self.target_crs.as_deref()
            .map(CoordinateSystemFactory::from_string)
            .transpose()
    }

    pub fn input_path(&self) -> GeoFenceResult<&Path> {
        required_path(&self.input, "input")
    }

    pub fn output_path(&self) -> GeoFenceResult<&Path> {
        required_path(&self.output, "output")
    }

    pub fn geometry_path(&self) -> GeoFenceResult<&Path> {
        required_path(&self.geometry, "geometry")
    }
}

/// A configured path, or a `ConfigError` naming the missing key
fn required_path<'a>(path: &'a Option<PathBuf>, name: &str) -> GeoFenceResult<&'a Path> {
    path.as_deref()
        .ok_or_else(|| config_error(format!("Missing {} path (set paths.{} or pass --{})", name, name, name)))
}

/// Single-character field delimiter
pub fn parse_delimiter(value: &str) -> GeoFenceResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(config_error(format!("Delimiter must be a single ASCII character, got {:?}", value))),
    }
}

fn section<'a>(table: &'a toml::Table, name: &str) -> GeoFenceResult<Option<&'a toml::Table>> {
    match table.get(name) {
        None => Ok(None),
        Some(value) => value.as_table()
            .map(Some)
            .ok_or_else(|| config_error(format!("[{}] must be a table", name))),
    }
}

fn string_value(table: &toml::Table, section: &str, key: &str) -> GeoFenceResult<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_str()
            .map(|s| Some(s.trim().to_string()))
            .ok_or_else(|| config_error(format!("{}.{} must be a string", section, key))),
    }
}

fn number_value(table: &toml::Table, section: &str, key: &str) -> GeoFenceResult<Option<f64>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_float()
            .or_else(|| value.as_integer().map(|i| i as f64))
            .map(Some)
            .ok_or_else(|| config_error(format!("{}.{} must be a number", section, key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let config = GeoFenceConfig::builtin().unwrap();
        assert_eq!(config.coarse_bounds, BoundingBox::new(-75.0, 40.0, -70.0, 42.0));
        assert_eq!(config.delimiter, ',');
        assert!(config.input.is_none());
        assert!(config.source_coordinate_system().unwrap().is_geographic());
        match config.target_coordinate_system().unwrap() {
            Some(CoordinateSystem::LambertConformalConic(lcc)) => assert_eq!(lcc.false_easting, 984250.0),
            other => panic!("expected LCC target, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides_are_key_by_key() {
        let config = GeoFenceConfig::from_str(r#"
            [paths]
            input = "studies.csv"

            [coarse_bounds]
            max_lat = 41
        "#).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("studies.csv")));
        assert!(config.output.is_none());
        assert_eq!(config.coarse_bounds, BoundingBox::new(-75.0, 40.0, -70.0, 41.0));
        assert!(config.target_crs.is_some());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(GeoFenceConfig::from_str("[format]\ndelimiter = \";;\""), Err(GeoFenceError::ConfigError(_))));
        assert!(matches!(GeoFenceConfig::from_str("[coarse_bounds]\nmin_lat = \"forty\""), Err(GeoFenceError::ConfigError(_))));
        assert!(matches!(GeoFenceConfig::from_str("[coarse_bounds]\nmin_lat = 50"), Err(GeoFenceError::ConfigError(_))));
        assert!(matches!(GeoFenceConfig::from_str("paths = 3"), Err(GeoFenceError::ConfigError(_))));
        assert!(matches!(GeoFenceConfig::from_str("not toml ["), Err(GeoFenceError::ConfigError(_))));
    }

    #[test]
    fn test_required_paths() {
        let config = GeoFenceConfig::from_str("[paths]\noutput = \"out.csv\"").unwrap();
        assert_eq!(config.output_path().unwrap(), Path::new("out.csv"));
        assert!(matches!(config.input_path(), Err(GeoFenceError::ConfigError(_))));
        assert!(matches!(config.geometry_path(), Err(GeoFenceError::ConfigError(_))));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("|").unwrap(), '|');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("§").is_err());
    }
}
