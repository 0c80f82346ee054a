//! Polygon ring structure

use crate::coordinate::{BoundingBox, Point};
use super::containment;

/// A single closed ring of planar vertices
///
/// The first and last vertex are implicitly connected. Holes are not
/// modelled. The bounding box is computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    bounds: Option<BoundingBox>,
}

impl Polygon {
    /// Create a polygon from its ring of vertices
    pub fn new(vertices: Vec<Point>) -> Self {
        let bounds = BoundingBox::from_points(&vertices);
        Polygon { vertices, bounds }
    }

    /// The ring's vertices in their original order
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices in the ring
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounding box of the ring, `None` when it has no vertices
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    /// Bounding-box pre-filter followed by the ray-casting test
    pub fn contains(&self, point: &Point) -> bool {
        match &self.bounds {
            Some(bbox) if bbox.contains(point) => containment::point_in_polygon(point, &self.vertices),
            _ => false,
        }
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(coords: Vec<(f64, f64)>) -> Self {
        Polygon::new(coords.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }
}
