//! Bounding box structure for defining regions

use super::point::Point;

/// An axis-aligned bounding box in a coordinate system
///
/// Containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Compute the bounding box of a set of points
    ///
    /// Returns `None` when `points` is empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for point in &points[1..] {
            bbox.min_x = bbox.min_x.min(point.x);
            bbox.min_y = bbox.min_y.min(point.y);
            bbox.max_x = bbox.max_x.max(point.x);
            bbox.max_y = bbox.max_y.max(point.y);
        }
        Some(bbox)
    }

    /// Parse a bounding box from a string (format: "minx,miny,maxx,maxy")
    pub fn from_string(bbox_str: &str) -> Result<Self, String> {
        let parts: Vec<&str> = bbox_str.split(',').collect();
        if parts.len() != 4 {
            return Err("Bounding box must have 4 comma-separated values".to_string());
        }

        let min_x = parts[0].trim().parse::<f64>()
            .map_err(|_| "Invalid min_x value".to_string())?;
        let min_y = parts[1].trim().parse::<f64>()
            .map_err(|_| "Invalid min_y value".to_string())?;
        let max_x = parts[2].trim().parse::<f64>()
            .map_err(|_| "Invalid max_x value".to_string())?;
        let max_y = parts[3].trim().parse::<f64>()
            .map_err(|_| "Invalid max_y value".to_string())?;

        if min_x > max_x || min_y > max_y {
            return Err(format!("Bounding box minimum exceeds maximum: {}", bbox_str));
        }

        Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Check if this bounding box contains a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x &&
            point.y >= self.min_y && point.y <= self.max_y
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = vec![
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 0.5),
        ];
        let bbox = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(-2.0, -1.0, 3.0, 4.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(-75.0, 40.0, -70.0, 42.0);
        assert!(bbox.contains(&Point::new(-75.0, 40.0)));
        assert!(bbox.contains(&Point::new(-70.0, 42.0)));
        assert!(bbox.contains(&Point::new(-74.0, 40.7)));
        assert!(!bbox.contains(&Point::new(-75.0001, 41.0)));
        assert!(!bbox.contains(&Point::new(-72.0, 42.0001)));
    }

    #[test]
    fn test_from_string() {
        let bbox = BoundingBox::from_string("-75, 40, -70, 42").unwrap();
        assert_eq!(bbox, BoundingBox::new(-75.0, 40.0, -70.0, 42.0));
        assert!(BoundingBox::from_string("1,2,3").is_err());
        assert!(BoundingBox::from_string("5,0,1,1").is_err());
    }

    #[test]
    fn test_union_and_center() {
        let a = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let b = BoundingBox::new(1.0, -1.0, 4.0, 1.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, -1.0, 4.0, 2.0));
        assert_eq!(u.center(), Point::new(2.0, 0.5));
    }
}
