//! Region geometry inspection command

use clap::ArgMatches;

use crate::api::GeoFence;
use crate::commands::command_traits::Command;
use crate::commands::load_config;
use crate::errors::GeoFenceResult;
use crate::utils::logger::Logger;

/// Command for describing the polygons of the region
pub struct InspectCommand<'a> {
    geofence: GeoFence,
    logger: &'a Logger,
}

impl<'a> InspectCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoFenceResult<Self> {
        let config = load_config(args)?;
        config.geometry_path()?;

        Ok(InspectCommand {
            geofence: GeoFence::new(config),
            logger,
        })
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn execute(&self) -> GeoFenceResult<()> {
        let description = self.geofence.inspect()?;
        println!("{}", description);
        self.logger.log(&description)?;
        Ok(())
    }
}
