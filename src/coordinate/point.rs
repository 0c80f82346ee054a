//! Point structure for representing coordinates

/// A point in a coordinate system
///
/// Geographic points carry longitude in `x` and latitude in `y`, both in
/// degrees. Planar points carry easting and northing in the linear unit of
/// their projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (longitude in geographic systems)
    pub x: f64,
    /// Y coordinate (latitude in geographic systems)
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Create a geographic point from longitude and latitude in degrees
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Point { x: lon, y: lat }
    }

    /// Parse a point from a string (format: "x,y")
    pub fn from_string(point_str: &str) -> Result<Self, String> {
        let parts: Vec<&str> = point_str.split(',').collect();
        if parts.len() != 2 {
            return Err("Coordinate must be in format 'x,y' or 'lon,lat'".to_string());
        }

        let x = parts[0].trim().parse::<f64>()
            .map_err(|_| format!("Invalid x/longitude value: {}", parts[0].trim()))?;
        let y = parts[1].trim().parse::<f64>()
            .map_err(|_| format!("Invalid y/latitude value: {}", parts[1].trim()))?;

        Ok(Point::new(x, y))
    }

    /// Whether both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
