//! Custom error types for the geofence pipeline

use std::fmt;
use std::io;

/// Errors raised while loading geometry, parsing records or reprojecting
#[derive(Debug)]
pub enum GeoFenceError {
    /// I/O error
    IoError(io::Error),
    /// A record line could not be parsed
    ParseError {
        /// 1-based line number in the input
        line: usize,
        /// The offending line
        content: String,
        /// What was wrong with it
        reason: String,
    },
    /// The geometry source could not supply polygons
    GeometrySourceError(String),
    /// A coordinate system could not be built or a point could not be transformed
    ReprojectionError(String),
    /// Invalid or incomplete configuration
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for GeoFenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoFenceError::IoError(e) => write!(f, "I/O error: {}", e),
            GeoFenceError::ParseError { line, content, reason } => {
                write!(f, "Parse error on line {} ({:?}): {}", line, content, reason)
            },
            GeoFenceError::GeometrySourceError(msg) => write!(f, "Geometry source error: {}", msg),
            GeoFenceError::ReprojectionError(msg) => write!(f, "Reprojection error: {}", msg),
            GeoFenceError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            GeoFenceError::GenericError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GeoFenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoFenceError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GeoFenceError {
    fn from(error: io::Error) -> Self {
        GeoFenceError::IoError(error)
    }
}

impl From<String> for GeoFenceError {
    fn from(msg: String) -> Self {
        GeoFenceError::GenericError(msg)
    }
}

/// Result type for geofence operations
pub type GeoFenceResult<T> = Result<T, GeoFenceError>;
