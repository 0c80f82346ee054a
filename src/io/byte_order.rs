//! Byte order handling for binary geometry files
//!
//! ESRI shapefiles mix byte orders: file and record headers are big-endian
//! while record contents are little-endian. Readers pick the handler for
//! each field group through the Strategy pattern below.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::SeekableReader;

/// Byte order of a group of fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian",
            ByteOrder::BigEndian => "Big Endian",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler {
    /// Read a signed 32-bit integer
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32>;

    /// Read a 64-bit float
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    /// Read an (x, y) pair of 64-bit floats
    fn read_xy(&self, reader: &mut dyn SeekableReader) -> Result<(f64, f64)> {
        let x = self.read_f64(reader)?;
        let y = self.read_f64(reader)?;
        Ok((x, y))
    }
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_i32(&self, reader: &mut dyn SeekableReader) -> Result<i32> {
        reader.read_i32::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }
}
