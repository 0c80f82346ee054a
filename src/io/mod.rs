//! Binary I/O helpers for geometry files

pub mod byte_order;

use std::io::{Read, Seek};

/// Readers that can both read and seek
///
/// Shapefile records are located by offset, so geometry readers take
/// any `Read + Seek` source: files, buffered files or in-memory cursors.
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}
