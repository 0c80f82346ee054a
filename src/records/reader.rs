//! Delimited record parsing
//!
//! Each line holds `<id><delim><latitude><delim><longitude>` with no header
//! and no quoting. Parsing is fail-fast: the first malformed line aborts
//! the whole load with a `ParseError` naming that line.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use csv::{ByteRecord, ReaderBuilder, Trim};
use log::{debug, info};

use crate::errors::{GeoFenceError, GeoFenceResult};
use super::record::Record;

/// Number of fields on every record line
pub const FIELD_COUNT: usize = 3;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn csv_error(err: csv::Error) -> GeoFenceError {
    let line = err.position().map_or(0, |pos| pos.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => GeoFenceError::IoError(e),
        _ => GeoFenceError::ParseError {
            line,
            content: String::new(),
            reason,
        },
    }
}

/// Parse the fields of one record line
///
/// # Arguments
/// * `fields` - The trimmed fields of the line
/// * `line_number` - 1-based line number used in error reports
/// * `delimiter` - Field separator, used to rebuild the line for error reports
pub fn parse_record(fields: &ByteRecord, line_number: usize, delimiter: char) -> GeoFenceResult<Record> {
    let content = fields.iter()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(&delimiter.to_string());
    let parse_error = |reason: String| GeoFenceError::ParseError {
        line: line_number,
        content: content.clone(),
        reason,
    };

    if fields.len() != FIELD_COUNT {
        return Err(parse_error(format!("expected {} fields, found {}", FIELD_COUNT, fields.len())));
    }

    let field = |index: usize, name: &str| {
        field_str(fields, index)
            .ok_or_else(|| parse_error(format!("{} is not valid UTF-8", name)))
    };

    let id_field = field(0, "id")?;
    let id = id_field.parse::<i64>()
        .map_err(|_| parse_error(format!("invalid id: {:?}", id_field)))?;
    let latitude_field = field(1, "latitude")?;
    let latitude = latitude_field.parse::<f64>()
        .map_err(|_| parse_error(format!("invalid latitude: {:?}", latitude_field)))?;
    let longitude_field = field(2, "longitude")?;
    let longitude = longitude_field.parse::<f64>()
        .map_err(|_| parse_error(format!("invalid longitude: {:?}", longitude_field)))?;

    Ok(Record::new(id, latitude, longitude))
}

fn field_str(fields: &ByteRecord, index: usize) -> Option<&str> {
    std::str::from_utf8(&fields[index]).ok().map(str::trim)
}

/// Drop a UTF-8 byte order mark from the first field
fn strip_bom(fields: ByteRecord) -> ByteRecord {
    match fields.get(0) {
        Some(first) if first.starts_with(UTF8_BOM) => {
            let mut stripped = ByteRecord::with_capacity(fields.as_slice().len(), fields.len());
            for (i, field) in fields.iter().enumerate() {
                stripped.push_field(if i == 0 { &field[UTF8_BOM.len()..] } else { field });
            }
            stripped
        },
        _ => fields,
    }
}

/// Load every record from a reader
///
/// Blank lines are skipped.
pub fn load_records<R: Read>(reader: R, delimiter: char) -> GeoFenceResult<Vec<Record>> {
    if !delimiter.is_ascii() {
        return Err(GeoFenceError::ConfigError(format!("Delimiter {:?} is not an ASCII character", delimiter)));
    }

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter as u8)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.byte_records() {
        let fields = result.map_err(csv_error)?;
        let line_number = fields.position()
            .map_or(records.len() + 1, |pos| pos.line() as usize);
        let fields = if records.is_empty() { strip_bom(fields) } else { fields };

        let record = parse_record(&fields, line_number, delimiter)?;
        debug!("Parsed record {} at ({}, {})", record.id, record.latitude(), record.longitude());
        records.push(record);
    }

    Ok(records)
}

/// Load every record from a file
pub fn load_records_from_file<P: AsRef<Path>>(path: P, delimiter: char) -> GeoFenceResult<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = load_records(file, delimiter)?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
