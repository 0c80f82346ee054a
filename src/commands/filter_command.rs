//! Record filtering command
//!
//! Runs the full pipeline: load the region, read the records, drop those
//! outside the coarse bounds, reproject the rest and write the identifiers
//! of the records inside the region.

use clap::ArgMatches;
use log::info;

use crate::api::GeoFence;
use crate::commands::command_traits::Command;
use crate::commands::load_config;
use crate::errors::GeoFenceResult;
use crate::filter::FilterSummary;
use crate::utils::logger::Logger;

/// Command for filtering a record file against the region
pub struct FilterCommand<'a> {
    geofence: GeoFence,
    /// Run log for recording operations
    logger: &'a Logger,
}

impl<'a> FilterCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoFenceResult<Self> {
        let config = load_config(args)?;
        // Fail before any work when a path is missing
        config.input_path()?;
        config.output_path()?;
        config.geometry_path()?;

        Ok(FilterCommand {
            geofence: GeoFence::new(config),
            logger,
        })
    }

    fn report(&self, summary: &FilterSummary) -> GeoFenceResult<()> {
        let config = self.geofence.config();
        println!("# of records read: {}", summary.records_read);
        println!("# inside coarse bounds: {}", summary.candidates);
        println!("# retained: {}", summary.retained);
        println!("Output written.");

        self.logger.log(&format!("input: {}", config.input_path()?.display()))?;
        self.logger.log(&format!("geometry: {}", config.geometry_path()?.display()))?;
        self.logger.log(&format!("output: {}", config.output_path()?.display()))?;
        self.logger.log(&format!("records read: {}", summary.records_read))?;
        self.logger.log(&format!("inside coarse bounds: {}", summary.candidates))?;
        self.logger.log(&format!("retained: {}", summary.retained))?;
        Ok(())
    }
}

impl<'a> Command for FilterCommand<'a> {
    fn execute(&self) -> GeoFenceResult<()> {
        info!("Filtering records");
        let summary = self.geofence.filter()?;
        self.report(&summary)
    }
}
