//! Utility modules for common functionality
//!
//! This module provides the run log and progress reporting used by the commands.

pub mod logger;
mod progress;

pub use self::progress::ProgressTracker;
