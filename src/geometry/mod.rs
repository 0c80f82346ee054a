//! Planar geometry and the point-in-region containment engine

pub mod containment;
mod polygon;
mod region;

pub use self::containment::{in_bounding_box, point_in_polygon};
pub use self::polygon::Polygon;
pub use self::region::Region;
