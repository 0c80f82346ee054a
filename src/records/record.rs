//! Geo-tagged record structure

use crate::coordinate::Point;

/// An identifier with a geographic location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Record identifier
    pub id: i64,
    /// Location, longitude in `x` and latitude in `y`
    pub location: Point,
}

impl Record {
    /// Create a record from its identifier, latitude and longitude
    pub fn new(id: i64, latitude: f64, longitude: f64) -> Self {
        Record {
            id,
            location: Point::from_lon_lat(longitude, latitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.location.y
    }

    pub fn longitude(&self) -> f64 {
        self.location.x
    }
}
