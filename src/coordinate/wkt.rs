//! Well-known text (WKT) coordinate system parsing
//!
//! Understands the subset of OGC/ESRI WKT found in shapefile `.prj`
//! sidecars: `GEOGCS[...]` and `PROJCS[...]` with SPHEROID, PROJECTION,
//! PARAMETER and UNIT nodes.

use std::collections::HashMap;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::errors::{GeoFenceError, GeoFenceResult};
use super::crs::{CoordinateSystem, Ellipsoid, LambertConformalConic};

lazy_static! {
    static ref ROOT_RE: Regex = Regex::new(r"^\s*([A-Za-z]+)\s*\[").unwrap();
    static ref SPHEROID_RE: Regex =
        Regex::new(r#"(?i)SPHEROID\s*\[\s*"[^"]*"\s*,\s*([-+0-9.eE]+)\s*,\s*([-+0-9.eE]+)"#).unwrap();
    static ref PROJECTION_RE: Regex = Regex::new(r#"(?i)PROJECTION\s*\[\s*"([^"]+)""#).unwrap();
    static ref PARAMETER_RE: Regex =
        Regex::new(r#"(?i)PARAMETER\s*\[\s*"([^"]+)"\s*,\s*([-+0-9.eE]+)\s*\]"#).unwrap();
    static ref UNIT_RE: Regex = Regex::new(r#"(?i)UNIT\s*\[\s*"([^"]*)"\s*,\s*([-+0-9.eE]+)"#).unwrap();
}

fn wkt_error(msg: String) -> GeoFenceError {
    GeoFenceError::ReprojectionError(msg)
}

fn parse_number(raw: &str, what: &str) -> GeoFenceResult<f64> {
    raw.parse::<f64>()
        .map_err(|_| wkt_error(format!("Invalid {} value in WKT: {}", what, raw)))
}

/// Normalize a WKT name for comparison ("Standard Parallel 1" -> "standard_parallel_1")
fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_").replace('-', "_")
}

fn parse_ellipsoid(wkt: &str) -> GeoFenceResult<Ellipsoid> {
    let caps = SPHEROID_RE.captures(wkt)
        .ok_or_else(|| wkt_error("WKT has no SPHEROID definition".to_string()))?;
    let semi_major = parse_number(&caps[1], "semi-major axis")?;
    let inverse_flattening = parse_number(&caps[2], "inverse flattening")?;
    Ok(Ellipsoid::new(semi_major, inverse_flattening))
}

fn parse_parameters(wkt: &str) -> GeoFenceResult<HashMap<String, f64>> {
    let mut params = HashMap::new();
    for caps in PARAMETER_RE.captures_iter(wkt) {
        let value = parse_number(&caps[2], &caps[1])?;
        params.insert(normalize(&caps[1]), value);
    }
    Ok(params)
}

/// Conversion factor from the projection's linear unit to meters
///
/// The linear unit is the last UNIT node of a PROJCS; angular units
/// belong to the nested GEOGCS and are skipped.
fn parse_linear_unit(wkt: &str) -> GeoFenceResult<f64> {
    match UNIT_RE.captures_iter(wkt).last() {
        Some(caps) if !normalize(&caps[1]).contains("degree") => parse_number(&caps[2], "unit"),
        _ => Ok(1.0),
    }
}

fn required(params: &HashMap<String, f64>, names: &[&str]) -> GeoFenceResult<f64> {
    names.iter()
        .find_map(|name| params.get(*name).copied())
        .ok_or_else(|| wkt_error(format!("WKT is missing parameter {}", names[0])))
}

fn parse_lambert(wkt: &str, ellipsoid: Ellipsoid) -> GeoFenceResult<CoordinateSystem> {
    let params = parse_parameters(wkt)?;
    let unit_to_meters = parse_linear_unit(wkt)?;

    let latitude_of_origin = required(&params, &["latitude_of_origin", "latitude_of_center"])?;
    let central_meridian = required(&params, &["central_meridian", "longitude_of_origin", "longitude_of_center"])?;
    let standard_parallel_1 = params.get("standard_parallel_1").copied().unwrap_or(latitude_of_origin);
    let standard_parallel_2 = params.get("standard_parallel_2").copied().unwrap_or(standard_parallel_1);

    Ok(CoordinateSystem::LambertConformalConic(LambertConformalConic {
        ellipsoid,
        latitude_of_origin,
        central_meridian,
        standard_parallel_1,
        standard_parallel_2,
        scale_factor: params.get("scale_factor").copied().unwrap_or(1.0),
        false_easting: params.get("false_easting").copied().unwrap_or(0.0),
        false_northing: params.get("false_northing").copied().unwrap_or(0.0),
        unit_to_meters,
    }))
}

/// Parse a WKT coordinate system definition
pub fn parse(wkt: &str) -> GeoFenceResult<CoordinateSystem> {
    let root = ROOT_RE.captures(wkt)
        .map(|caps| caps[1].to_uppercase())
        .ok_or_else(|| wkt_error("Not a WKT definition".to_string()))?;

    let ellipsoid = parse_ellipsoid(wkt)?;

    match root.as_str() {
        "GEOGCS" => {
            debug!("Parsed geographic WKT with ellipsoid {:?}", ellipsoid);
            Ok(CoordinateSystem::Geographic(ellipsoid))
        },
        "PROJCS" => {
            let projection = PROJECTION_RE.captures(wkt)
                .map(|caps| normalize(&caps[1]))
                .ok_or_else(|| wkt_error("PROJCS has no PROJECTION".to_string()))?;
            debug!("Parsed projected WKT with projection {}", projection);

            match projection.as_str() {
                "lambert_conformal_conic"
                | "lambert_conformal_conic_1sp"
                | "lambert_conformal_conic_2sp" => parse_lambert(wkt, ellipsoid),
                "mercator_auxiliary_sphere"
                | "popular_visualisation_pseudo_mercator" => Ok(CoordinateSystem::WebMercator),
                other => Err(wkt_error(format!("Unsupported projection: {}", other))),
            }
        },
        other => Err(wkt_error(format!("Unsupported WKT root: {}", other))),
    }
}
