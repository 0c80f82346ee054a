//! Region structure for the area of interest
//!
//! A region is the union of its polygons: a point is inside the region
//! when it is inside at least one member polygon.

use log::debug;

use crate::coordinate::{BoundingBox, Point};
use super::polygon::Polygon;

/// Immutable union of polygons
#[derive(Debug, Clone, Default)]
pub struct Region {
    polygons: Vec<Polygon>,
}

impl Region {
    /// Create a region from its polygons, kept in the given order
    pub fn new(polygons: Vec<Polygon>) -> Self {
        debug!("Built region from {} polygons", polygons.len());
        Region { polygons }
    }

    /// The member polygons in stored order
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Number of member polygons
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Index of the first polygon containing `point`
    pub fn find(&self, point: &Point) -> Option<usize> {
        self.polygons.iter().position(|polygon| polygon.contains(point))
    }

    /// Whether `point` lies inside any member polygon
    pub fn contains(&self, point: &Point) -> bool {
        self.find(point).is_some()
    }

    /// Bounding box covering every polygon, `None` for an empty region
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.polygons.iter()
            .filter_map(|polygon| polygon.bounds().copied())
            .reduce(|acc, bbox| acc.union(&bbox))
    }

    /// Total number of vertices across all polygons
    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }
}

impl From<Vec<Polygon>> for Region {
    fn from(polygons: Vec<Polygon>) -> Self {
        Region::new(polygons)
    }
}
