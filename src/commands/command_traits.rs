//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application.

use crate::utils::logger::Logger;
use crate::errors::GeoFenceResult;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> GeoFenceResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Run log for recording operations
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> GeoFenceResult<Box<dyn Command + 'a>>;
}
