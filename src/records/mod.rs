//! Geo-tagged records and their delimited text format

mod record;
pub mod reader;
pub mod writer;

pub use self::record::Record;
pub use self::reader::{load_records, load_records_from_file};
pub use self::writer::{format_output, write_output, write_output_to_file};
