pub mod errors;
pub mod io;
pub mod utils;
pub mod coordinate;
pub mod geometry;
pub mod records;
pub mod source;
pub mod filter;
pub mod commands;
pub mod api;

pub use crate::api::{GeoFence, LocateReport};
pub use crate::errors::{GeoFenceError, GeoFenceResult};

pub use geometry::{Polygon, Region};
pub use records::Record;
pub use source::{GeometrySource, GeoJsonSource, ShapefileSource};
pub use filter::{FilterSettings, FilterSummary, GeoFenceConfig, GeoFilter};
pub use coordinate::{BoundingBox, Point, CoordinateTransformer, CoordinateSystem, CoordinateSystemFactory, Reprojector};
