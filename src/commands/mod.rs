//! CLI command implementations
//!
//! This module contains the command-line definition and the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod filter_command;
pub mod inspect_command;
pub mod locate_command;

pub use command_traits::{Command, CommandFactory};
pub use filter_command::FilterCommand;
pub use inspect_command::InspectCommand;
pub use locate_command::LocateCommand;

use std::path::PathBuf;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::coordinate::BoundingBox;
use crate::errors::{GeoFenceError, GeoFenceResult};
use crate::filter::config::{parse_delimiter, GeoFenceConfig};
use crate::utils::logger::Logger;

/// Command-line definition of the `geofence` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("geofence")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep the records whose coordinates fall inside a polygon region")
        .arg(
            Arg::new("input")
                .help("Input record file (id,latitude,longitude per line)")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file for retained identifiers")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("geometry")
                .short('g')
                .long("geometry")
                .help("Region geometry (.shp or .geojson)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file overriding the built-in defaults")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("source-crs")
                .long("source-crs")
                .help("Coordinate system of the records (EPSG:nnnn or WKT)")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("target-crs")
                .long("target-crs")
                .help("Coordinate system of the region (EPSG:nnnn or WKT)")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("coarse-bbox")
                .long("coarse-bbox")
                .help("Coarse geographic bounds (minlon,minlat,maxlon,maxlat)")
                .value_name("BBOX")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .help("Field delimiter for records and output")
                .value_name("CHAR")
                .required(false),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Describe the region geometry instead of filtering")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("locate")
                .long("locate")
                .help("Report where a single coordinate falls")
                .value_name("LON,LAT")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Run log file")
                .value_name("FILE")
                .default_value("geofence.log"),
        )
        .arg(
            Arg::new("log-to-file")
                .long("log-to-file")
                .help("Send diagnostic logging to this file instead of stderr")
                .value_name("FILE")
                .required(false),
        )
}

/// Build the run configuration from the config layers and CLI overrides
pub fn load_config(args: &ArgMatches) -> GeoFenceResult<GeoFenceConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => GeoFenceConfig::from_file(path)?,
        None => GeoFenceConfig::builtin()?,
    };

    if let Some(input) = args.get_one::<String>("input") {
        config.input = Some(PathBuf::from(input));
    }
    if let Some(output) = args.get_one::<String>("output") {
        config.output = Some(PathBuf::from(output));
    }
    if let Some(geometry) = args.get_one::<String>("geometry") {
        config.geometry = Some(PathBuf::from(geometry));
    }
    if let Some(source_crs) = args.get_one::<String>("source-crs") {
        config.source_crs = source_crs.clone();
    }
    if let Some(target_crs) = args.get_one::<String>("target-crs") {
        config.target_crs = Some(target_crs.clone());
    }
    if let Some(bbox) = args.get_one::<String>("coarse-bbox") {
        config.coarse_bounds = BoundingBox::from_string(bbox)
            .map_err(|e| GeoFenceError::ConfigError(format!("Invalid --coarse-bbox: {}", e)))?;
    }
    if let Some(delimiter) = args.get_one::<String>("delimiter") {
        config.delimiter = parse_delimiter(delimiter)?;
    }

    Ok(config)
}

/// Factory for creating command instances based on CLI arguments
pub struct GeoFenceCommandFactory;

impl GeoFenceCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        GeoFenceCommandFactory
    }
}

impl Default for GeoFenceCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for GeoFenceCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> GeoFenceResult<Box<dyn Command + 'a>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args, logger)?))
        } else if args.contains_id("locate") {
            Ok(Box::new(LocateCommand::new(args, logger)?))
        } else {
            // Default to filtering
            Ok(Box::new(FilterCommand::new(args, logger)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        build_cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = parse(&[
            "geofence", "studies.csv", "-o", "kept.csv", "-g", "nybb.shp",
            "--coarse-bbox", "-74.5,40.4,-73.6,41.0", "--delimiter", ";",
            "--target-crs", "EPSG:2263",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("studies.csv")));
        assert_eq!(config.output, Some(PathBuf::from("kept.csv")));
        assert_eq!(config.geometry, Some(PathBuf::from("nybb.shp")));
        assert_eq!(config.coarse_bounds, BoundingBox::new(-74.5, 40.4, -73.6, 41.0));
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.target_crs.as_deref(), Some("EPSG:2263"));
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = load_config(&parse(&["geofence"])).unwrap();
        assert_eq!(config, GeoFenceConfig::builtin().unwrap());
    }

    #[test]
    fn test_invalid_overrides() {
        let bad_bbox = parse(&["geofence", "--coarse-bbox", "-70,40,-75,42"]);
        assert!(matches!(load_config(&bad_bbox), Err(GeoFenceError::ConfigError(_))));

        let missing_config = parse(&["geofence", "--config", "/nonexistent/geofence.toml"]);
        assert!(matches!(load_config(&missing_config), Err(GeoFenceError::ConfigError(_))));
    }

    #[test]
    fn test_factory_requires_paths() {
        let logger = Logger::disabled();
        let factory = GeoFenceCommandFactory::new();

        let missing_output = parse(&["geofence", "studies.csv", "-g", "nybb.shp"]);
        assert!(matches!(factory.create_command(&missing_output, &logger), Err(GeoFenceError::ConfigError(_))));

        let bad_locate = parse(&["geofence", "--locate", "east", "-g", "nybb.shp"]);
        assert!(matches!(factory.create_command(&bad_locate, &logger), Err(GeoFenceError::ConfigError(_))));

        let inspect = parse(&["geofence", "--inspect", "-g", "nybb.shp"]);
        assert!(factory.create_command(&inspect, &logger).is_ok());
    }
}
