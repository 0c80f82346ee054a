//! Coordinate handling for geospatial data
//!
//! This module provides points, bounding boxes, coordinate system
//! definitions and the transformations between them.

mod bbox;
mod point;
mod transform;
mod crs;
mod wkt;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::point::Point;
pub use self::transform::{CoordinateTransformer, Reprojector};
pub use self::crs::{CoordinateSystem, CoordinateSystemFactory, Ellipsoid, LambertConformalConic, US_SURVEY_FOOT};
