//! Record filtering against a region
//!
//! Combines the run configuration with the pipeline that takes records
//! from the input file to the retained identifiers in the output file.

pub mod config;
mod geo_filter;

pub use self::config::GeoFenceConfig;
pub use self::geo_filter::{FilterOutcome, FilterSettings, FilterSummary, GeoFilter};
