//! Output writing for retained records
//!
//! The output is a single line of identifiers, each followed by the
//! delimiter, then a line terminator.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;

use crate::errors::GeoFenceResult;
use super::record::Record;

/// Format retained identifiers as one delimited line, without the terminator
pub fn format_output(records: &[Record], delimiter: char) -> String {
    let mut line = String::new();
    for record in records {
        line.push_str(&record.id.to_string());
        line.push(delimiter);
    }
    line
}

/// Write the identifiers of `records` to `writer`
pub fn write_output<W: Write>(records: &[Record], writer: &mut W, delimiter: char) -> GeoFenceResult<()> {
    writeln!(writer, "{}", format_output(records, delimiter))?;
    writer.flush()?;
    Ok(())
}

/// Write the identifiers of `records` to a file, replacing it
pub fn write_output_to_file<P: AsRef<Path>>(records: &[Record], path: P, delimiter: char) -> GeoFenceResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_output(records, &mut writer, delimiter)?;
    info!("Wrote {} identifiers to {}", records.len(), path.display());
    Ok(())
}
