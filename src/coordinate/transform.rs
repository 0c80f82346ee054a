//! Coordinate transformation functionality

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use log::debug;

use super::point::Point;
use super::bbox::BoundingBox;
use super::crs::{CoordinateSystem, LambertConformalConic};
use crate::errors::{GeoFenceError, GeoFenceResult};

/// Converts points between two coordinate systems
///
/// This is the seam the filter pipeline reprojects through. Implementations
/// must be pure: the same inputs always give the same output.
pub trait Reprojector {
    /// Transform `point` from `from_crs` into `to_crs`
    fn reproject(&self, point: &Point, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> GeoFenceResult<Point>;
}

/// Derived constants of a Lambert Conformal Conic projection
struct LambertConstants {
    n: f64,
    /// a * F * k0, in meters
    af: f64,
    /// Radius at the latitude of origin, in meters
    r_origin: f64,
    e: f64,
}

impl LambertConstants {
    fn new(lcc: &LambertConformalConic) -> GeoFenceResult<Self> {
        let a = lcc.ellipsoid.semi_major;
        let e = lcc.ellipsoid.eccentricity();

        let phi1 = lcc.standard_parallel_1.to_radians();
        let phi2 = lcc.standard_parallel_2.to_radians();
        let phi0 = lcc.latitude_of_origin.to_radians();

        let m1 = lambert_m(phi1, e);
        let t1 = lambert_t(phi1, e);

        let n = if (phi1 - phi2).abs() < 1e-12 {
            phi1.sin()
        } else {
            let m2 = lambert_m(phi2, e);
            let t2 = lambert_t(phi2, e);
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };

        if n == 0.0 || !n.is_finite() {
            return Err(GeoFenceError::ReprojectionError(
                "Lambert Conformal Conic parallels give a degenerate cone".to_string()));
        }

        let f = m1 / (n * t1.powf(n));
        let af = a * f * lcc.scale_factor;
        let r_origin = af * lambert_t(phi0, e).powf(n);

        Ok(LambertConstants { n, af, r_origin, e })
    }
}

fn lambert_m(phi: f64, e: f64) -> f64 {
    phi.cos() / (1.0 - e * e * phi.sin().powi(2)).sqrt()
}

fn lambert_t(phi: f64, e: f64) -> f64 {
    let esin = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - esin) / (1.0 + esin)).powf(e / 2.0)
}

/// Transformer for converting between coordinate systems
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateTransformer;

impl CoordinateTransformer {
    /// Earth radius in meters
    const EARTH_RADIUS: f64 = 6378137.0;

    /// Maximum iterations when inverting the Lambert latitude series
    const MAX_ITERATIONS: usize = 15;

    pub fn new() -> Self {
        CoordinateTransformer
    }

    /// Convert from geographic degrees to Web Mercator (EPSG:3857)
    pub fn wgs84_to_web_mercator(&self, lon: f64, lat: f64) -> Point {
        // Web Mercator has limits - constrain latitude to valid range
        let lat = lat.max(-85.05).min(85.05);

        let x = lon * Self::EARTH_RADIUS * PI / 180.0;
        let y = f64::ln(f64::tan((90.0 + lat) * PI / 360.0)) * Self::EARTH_RADIUS;

        Point::new(x, y)
    }

    /// Convert from Web Mercator (EPSG:3857) to geographic degrees
    pub fn web_mercator_to_wgs84(&self, x: f64, y: f64) -> Point {
        let lon = x * 180.0 / (Self::EARTH_RADIUS * PI);
        let lat = 180.0 / PI * (2.0 * f64::atan(f64::exp(y / Self::EARTH_RADIUS)) - PI / 2.0);

        Point::new(lon, lat)
    }

    /// Project geographic degrees onto a Lambert Conformal Conic plane
    ///
    /// Results are in the projection's linear unit.
    pub fn geographic_to_lambert(&self, lcc: &LambertConformalConic, lon: f64, lat: f64) -> GeoFenceResult<Point> {
        let k = LambertConstants::new(lcc)?;

        let phi = lat.to_radians();
        let r = k.af * lambert_t(phi, k.e).powf(k.n);
        let theta = k.n * (lon - lcc.central_meridian).to_radians();

        let x = lcc.false_easting + r * theta.sin() / lcc.unit_to_meters;
        let y = lcc.false_northing + (k.r_origin - r * theta.cos()) / lcc.unit_to_meters;

        Ok(Point::new(x, y))
    }

    /// Invert a Lambert Conformal Conic position back to geographic degrees
    pub fn lambert_to_geographic(&self, lcc: &LambertConformalConic, x: f64, y: f64) -> GeoFenceResult<Point> {
        let k = LambertConstants::new(lcc)?;

        let dx = (x - lcc.false_easting) * lcc.unit_to_meters;
        let dy = k.r_origin - (y - lcc.false_northing) * lcc.unit_to_meters;

        let r = k.n.signum() * (dx * dx + dy * dy).sqrt();
        let t = (r / k.af).powf(1.0 / k.n);
        let theta = if k.n > 0.0 { dx.atan2(dy) } else { (-dx).atan2(-dy) };

        let lon = (theta / k.n).to_degrees() + lcc.central_meridian;

        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..Self::MAX_ITERATIONS {
            let esin = k.e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - esin) / (1.0 + esin)).powf(k.e / 2.0)).atan();
            let converged = (next - phi).abs() < 1e-12;
            phi = next;
            if converged {
                break;
            }
        }

        Ok(Point::new(lon, phi.to_degrees()))
    }

    /// Transform a point between coordinate systems
    pub fn transform_point(&self, point: &Point, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> GeoFenceResult<Point> {
        if from_crs == to_crs {
            return Ok(*point);
        }

        let transformed = match (from_crs, to_crs) {
            // Datum shifts between geographic systems are not modelled
            (CoordinateSystem::Geographic(_), CoordinateSystem::Geographic(_)) => *point,
            (CoordinateSystem::Geographic(_), CoordinateSystem::WebMercator) => {
                self.wgs84_to_web_mercator(point.x, point.y)
            },
            (CoordinateSystem::WebMercator, CoordinateSystem::Geographic(_)) => {
                self.web_mercator_to_wgs84(point.x, point.y)
            },
            (CoordinateSystem::Geographic(_), CoordinateSystem::LambertConformalConic(lcc)) => {
                self.geographic_to_lambert(lcc, point.x, point.y)?
            },
            (CoordinateSystem::LambertConformalConic(lcc), CoordinateSystem::Geographic(_)) => {
                self.lambert_to_geographic(lcc, point.x, point.y)?
            },
            (CoordinateSystem::LambertConformalConic(lcc), CoordinateSystem::WebMercator) => {
                let geographic = self.lambert_to_geographic(lcc, point.x, point.y)?;
                self.wgs84_to_web_mercator(geographic.x, geographic.y)
            },
            (CoordinateSystem::WebMercator, CoordinateSystem::LambertConformalConic(lcc)) => {
                let geographic = self.web_mercator_to_wgs84(point.x, point.y);
                self.geographic_to_lambert(lcc, geographic.x, geographic.y)?
            },
            _ => return Err(GeoFenceError::ReprojectionError(format!(
                "Unsupported coordinate transformation from {} to {}",
                from_crs.description(), to_crs.description()
            ))),
        };

        if !transformed.is_finite() {
            return Err(GeoFenceError::ReprojectionError(format!(
                "Transforming ({}, {}) produced a non-finite result", point.x, point.y
            )));
        }

        debug!("Transformed ({}, {}) to ({}, {})", point.x, point.y, transformed.x, transformed.y);
        Ok(transformed)
    }

    /// Transform a bounding box between coordinate systems
    ///
    /// All four corners are transformed so the result covers the source box
    /// even when the projection rotates it.
    pub fn transform_bbox(&self, bbox: &BoundingBox, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> GeoFenceResult<BoundingBox> {
        if from_crs == to_crs {
            return Ok(*bbox);
        }

        let corners = [
            Point::new(bbox.min_x, bbox.min_y),
            Point::new(bbox.min_x, bbox.max_y),
            Point::new(bbox.max_x, bbox.min_y),
            Point::new(bbox.max_x, bbox.max_y),
        ];

        let mut transformed = Vec::with_capacity(corners.len());
        for corner in &corners {
            transformed.push(self.transform_point(corner, from_crs, to_crs)?);
        }

        BoundingBox::from_points(&transformed)
            .ok_or_else(|| GeoFenceError::ReprojectionError("Empty bounding box".to_string()))
    }
}

impl Reprojector for CoordinateTransformer {
    fn reproject(&self, point: &Point, from_crs: &CoordinateSystem, to_crs: &CoordinateSystem) -> GeoFenceResult<Point> {
        self.transform_point(point, from_crs, to_crs)
    }
}
