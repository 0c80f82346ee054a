//! Record filtering pipeline
//!
//! Records pass through three stages: the coarse geographic box, the
//! reprojection into the region's coordinate system, and the containment
//! test against the region. Input order is preserved throughout.

use std::path::Path;
use log::{debug, info};

use crate::coordinate::{BoundingBox, CoordinateSystem, Point, Reprojector};
use crate::errors::GeoFenceResult;
use crate::geometry::Region;
use crate::records::{reader, writer, Record};
use crate::utils::ProgressTracker;

/// Coordinate systems and coarse bounds for a filter run
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    /// System the record coordinates are expressed in
    pub source_crs: CoordinateSystem,
    /// System the region vertices are expressed in
    pub target_crs: CoordinateSystem,
    /// Geographic pre-filter, longitude in x and latitude in y
    pub coarse_bounds: BoundingBox,
}

/// Record counts after each stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSummary {
    pub records_read: usize,
    /// Records inside the coarse bounds
    pub candidates: usize,
    pub retained: usize,
}

/// Retained records together with the stage counts
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub retained: Vec<Record>,
    pub summary: FilterSummary,
}

/// Filters records against a region
pub struct GeoFilter {
    region: Region,
    settings: FilterSettings,
    reprojector: Box<dyn Reprojector>,
}

impl GeoFilter {
    pub fn new(region: Region, settings: FilterSettings, reprojector: Box<dyn Reprojector>) -> Self {
        GeoFilter {
            region,
            settings,
            reprojector,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Whether a record's geographic location lies inside the coarse bounds
    pub fn in_coarse_bounds(&self, record: &Record) -> bool {
        self.settings.coarse_bounds.contains(&record.location)
    }

    /// Drop records outside the coarse bounds
    pub fn coarse_filter(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter()
            .filter(|record| self.in_coarse_bounds(record))
            .collect()
    }

    /// Planar position of a record in the region's coordinate system
    pub fn reproject(&self, record: &Record) -> GeoFenceResult<Point> {
        self.reprojector.reproject(&record.location, &self.settings.source_crs, &self.settings.target_crs)
    }

    /// Keep the records whose reprojected position lies inside the region
    pub fn filter(&self, records: &[Record]) -> GeoFenceResult<Vec<Record>> {
        let progress = ProgressTracker::new(records.len() as u64, "Reprojecting records");
        let mut retained = Vec::new();

        for record in records {
            let planar = match self.reproject(record) {
                Ok(planar) => planar,
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            };

            match self.region.find(&planar) {
                Some(index) => {
                    debug!("Record {} at ({}, {}) is inside polygon {}", record.id, planar.x, planar.y, index);
                    retained.push(*record);
                },
                None => debug!("Record {} at ({}, {}) is outside the region", record.id, planar.x, planar.y),
            }
            progress.increment(1);
        }

        progress.finish();
        Ok(retained)
    }

    /// Run the coarse filter and the containment filter over loaded records
    pub fn process(&self, records: Vec<Record>) -> GeoFenceResult<FilterOutcome> {
        let records_read = records.len();
        let candidates = self.coarse_filter(records);
        info!("{} of {} records inside coarse bounds {}", candidates.len(), records_read, self.settings.coarse_bounds);

        let retained = self.filter(&candidates)?;
        let summary = FilterSummary {
            records_read,
            candidates: candidates.len(),
            retained: retained.len(),
        };
        Ok(FilterOutcome { retained, summary })
    }

    /// Load records from `input`, filter them and write the retained identifiers to `output`
    ///
    /// Nothing is written unless every record parses and reprojects.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q, delimiter: char) -> GeoFenceResult<FilterSummary> {
        let records = reader::load_records_from_file(input, delimiter)?;
        let outcome = self.process(records)?;
        writer::write_output_to_file(&outcome.retained, output, delimiter)?;

        Ok(outcome.summary)
    }
}
