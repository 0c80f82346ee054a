//! Coordinate Reference System handling

use crate::errors::{GeoFenceError, GeoFenceResult};
use super::wkt;

/// Reference ellipsoid of a geodetic datum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub semi_major: f64,
    /// Inverse flattening (0 for a sphere)
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    /// GRS 1980, used by NAD83
    pub const GRS80: Ellipsoid = Ellipsoid { semi_major: 6378137.0, inverse_flattening: 298.257222101 };
    /// WGS 84
    pub const WGS84: Ellipsoid = Ellipsoid { semi_major: 6378137.0, inverse_flattening: 298.257223563 };

    /// Create an ellipsoid from its semi-major axis and inverse flattening
    pub fn new(semi_major: f64, inverse_flattening: f64) -> Self {
        Ellipsoid { semi_major, inverse_flattening }
    }

    /// First eccentricity squared
    pub fn eccentricity_squared(&self) -> f64 {
        if self.inverse_flattening == 0.0 {
            return 0.0;
        }
        let f = 1.0 / self.inverse_flattening;
        2.0 * f - f * f
    }

    /// First eccentricity
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }
}

/// Parameters of a Lambert Conformal Conic projection
///
/// Angles are in degrees. False easting and northing are in the projection's
/// linear unit, and `unit_to_meters` converts that unit to meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalConic {
    pub ellipsoid: Ellipsoid,
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub unit_to_meters: f64,
}

/// Supported coordinate systems
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateSystem {
    /// Longitude/latitude in degrees on the given ellipsoid
    Geographic(Ellipsoid),
    /// Web Mercator (EPSG:3857), meters on a sphere
    WebMercator,
    /// Lambert Conformal Conic, as used by US state plane zones
    LambertConformalConic(LambertConformalConic),
}

impl CoordinateSystem {
    /// Whether coordinates in this system are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::Geographic(_))
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::Geographic(ellipsoid) => format!(
                "Geographic (a={}, 1/f={})",
                ellipsoid.semi_major, ellipsoid.inverse_flattening
            ),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::LambertConformalConic(lcc) => format!(
                "Lambert Conformal Conic (lat_0={}, lon_0={}, lat_1={}, lat_2={}, x_0={}, y_0={}, unit={}m)",
                lcc.latitude_of_origin, lcc.central_meridian,
                lcc.standard_parallel_1, lcc.standard_parallel_2,
                lcc.false_easting, lcc.false_northing, lcc.unit_to_meters
            ),
        }
    }
}

/// US survey foot in meters
pub const US_SURVEY_FOOT: f64 = 0.3048006096012192;

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> GeoFenceResult<CoordinateSystem> {
        match epsg {
            4326 => Ok(CoordinateSystem::Geographic(Ellipsoid::WGS84)),
            4269 => Ok(CoordinateSystem::Geographic(Ellipsoid::GRS80)),
            3857 => Ok(CoordinateSystem::WebMercator),
            // NAD83 / New York Long Island (ftUS)
            2263 => Ok(CoordinateSystem::LambertConformalConic(LambertConformalConic {
                ellipsoid: Ellipsoid::GRS80,
                latitude_of_origin: 40.0 + 10.0 / 60.0,
                central_meridian: -74.0,
                standard_parallel_1: 41.0 + 2.0 / 60.0,
                standard_parallel_2: 40.0 + 40.0 / 60.0,
                scale_factor: 1.0,
                false_easting: 300000.0 / US_SURVEY_FOOT,
                false_northing: 0.0,
                unit_to_meters: US_SURVEY_FOOT,
            })),
            _ => Err(GeoFenceError::ReprojectionError(format!("Unsupported EPSG code: {}", epsg))),
        }
    }

    /// Parse a coordinate system from a WKT definition
    pub fn from_wkt(wkt_str: &str) -> GeoFenceResult<CoordinateSystem> {
        wkt::parse(wkt_str)
    }

    /// Parse a coordinate system from a string
    ///
    /// Accepts "EPSG:4326", a bare EPSG number, or a WKT definition.
    pub fn from_string(crs_str: &str) -> GeoFenceResult<CoordinateSystem> {
        let trimmed = crs_str.trim();
        let upper = trimmed.to_uppercase();

        if let Some(epsg_str) = upper.strip_prefix("EPSG:") {
            match epsg_str.trim().parse::<u32>() {
                Ok(epsg) => Self::from_epsg(epsg),
                Err(_) => Err(GeoFenceError::ReprojectionError(format!("Invalid EPSG code: {}", epsg_str))),
            }
        } else if let Ok(epsg) = upper.parse::<u32>() {
            Self::from_epsg(epsg)
        } else if upper.starts_with("PROJCS") || upper.starts_with("GEOGCS") {
            Self::from_wkt(trimmed)
        } else {
            Err(GeoFenceError::ReprojectionError(format!("Unsupported CRS format: {}", trimmed)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_epsg() {
        assert_eq!(CoordinateSystemFactory::from_epsg(4326).unwrap(), CoordinateSystem::Geographic(Ellipsoid::WGS84));
        assert_eq!(CoordinateSystemFactory::from_epsg(3857).unwrap(), CoordinateSystem::WebMercator);
        assert!(CoordinateSystemFactory::from_epsg(2263).unwrap().description().contains("Lambert"));
        assert!(CoordinateSystemFactory::from_epsg(32618).is_err());
    }

    #[test]
    fn test_from_string_variants() {
        assert_eq!(CoordinateSystemFactory::from_string("epsg:4269").unwrap(), CoordinateSystem::Geographic(Ellipsoid::GRS80));
        assert_eq!(CoordinateSystemFactory::from_string(" 3857 ").unwrap(), CoordinateSystem::WebMercator);
        assert!(CoordinateSystemFactory::from_string("EPSG:abc").is_err());
        assert!(CoordinateSystemFactory::from_string("+proj=longlat").is_err());
    }

    #[test]
    fn test_eccentricity() {
        let e2 = Ellipsoid::GRS80.eccentricity_squared();
        assert!((e2 - 0.00669438002290).abs() < 1e-12);
        assert_eq!(Ellipsoid::new(6371000.0, 0.0).eccentricity(), 0.0);
    }
}
