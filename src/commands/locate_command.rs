//! Single coordinate lookup command
//!
//! Shows where one longitude/latitude lands: its planar position in the
//! region's coordinate system, whether it passes the coarse bounds and which
//! polygon contains it.

use clap::ArgMatches;
use log::debug;

use crate::api::GeoFence;
use crate::commands::command_traits::Command;
use crate::commands::load_config;
use crate::coordinate::Point;
use crate::errors::{GeoFenceError, GeoFenceResult};
use crate::utils::logger::Logger;

/// Command for locating one coordinate against the region
pub struct LocateCommand<'a> {
    geofence: GeoFence,
    /// Longitude in `x`, latitude in `y`
    location: Point,
    logger: &'a Logger,
}

impl<'a> LocateCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoFenceResult<Self> {
        let location_str = args.get_one::<String>("locate")
            .ok_or_else(|| GeoFenceError::ConfigError("Missing coordinate for --locate".to_string()))?;
        let location = Point::from_string(location_str)
            .map_err(|e| GeoFenceError::ConfigError(format!("Invalid --locate value: {}", e)))?;
        debug!("Locating lon {}, lat {}", location.x, location.y);

        let config = load_config(args)?;
        config.geometry_path()?;

        Ok(LocateCommand {
            geofence: GeoFence::new(config),
            location,
            logger,
        })
    }
}

impl<'a> Command for LocateCommand<'a> {
    fn execute(&self) -> GeoFenceResult<()> {
        let report = self.geofence.locate(self.location.x, self.location.y)?;
        println!("{}", report);
        self.logger.log(&report.to_string())?;
        Ok(())
    }
}
