//! Point-in-polygon containment tests
//!
//! Two stages: a cheap axis-aligned bounding box check, then an even-odd
//! ray-casting test over the ring's edges.
//!
//! Points lying exactly on an edge or vertex have no guaranteed answer.
//! The crossing rule below decides them by floating point comparison ties,
//! so callers should not rely on boundary behaviour.

use crate::coordinate::{BoundingBox, Point};

/// Whether `point` lies inside the bounding box of `vertices` (edges inclusive)
///
/// An empty vertex list has no bounding box and contains nothing.
pub fn in_bounding_box(point: &Point, vertices: &[Point]) -> bool {
    match BoundingBox::from_points(vertices) {
        Some(bbox) => bbox.contains(point),
        None => false,
    }
}

/// Even-odd ray-casting test of `point` against a closed ring
///
/// The ring is implicitly closed: the last vertex connects back to the
/// first. Rings with fewer than 3 vertices contain no points.
pub fn point_in_polygon(point: &Point, ring: &[Point]) -> bool {
    let mut inside = false;

    if ring.len() < 3 {
        return inside;
    }

    let mut old_vertex = ring[ring.len() - 1];

    for &new_vertex in ring {
        let (p1, p2) = if new_vertex.x > old_vertex.x {
            (old_vertex, new_vertex)
        } else {
            (new_vertex, old_vertex)
        };

        let crosses = (new_vertex.x < point.x) == (point.x <= old_vertex.x);
        if crosses && (point.y - p1.y) * (p2.x - p1.x) < (p2.y - p1.y) * (point.x - p1.x) {
            inside = !inside;
        }

        old_vertex = new_vertex;
    }

    inside
}
