//! Record table reader and writer.
//!
//! The record table is the file handed from the extraction stage to the
//! segmentation stage.
//!
//! # Format
//! - Header: `convo,timestamp,sender,message`
//! - Delimiter: `,`
//! - Text fields quoted, internal quotes doubled; timestamps (and numeric
//!   conversation ids) bare
//! - Line breaks inside fields collapsed to spaces
//! - Encoding: UTF-8

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};

use crate::RawRecord;
use crate::error::{ConvopackError, Result};
use crate::parsing::sanitize_field;

/// Column names of the record table, in order.
pub const RECORD_TABLE_HEADER: [&str; 4] = ["convo", "timestamp", "sender", "message"];

/// Writes records to a record table file.
pub fn write_records(records: &[RawRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_records_to(records, BufWriter::new(file))
}

/// Converts records to a record table string.
///
/// Same format as [`write_records`], but returns a String instead of writing to file.
pub fn to_records_csv(records: &[RawRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records_to(records, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ConvopackError::invalid_format("record table", e.to_string()))
}

fn write_records_to<W: Write>(records: &[RawRecord], mut sink: W) -> Result<()> {
    // Header goes out bare; NonNumeric quoting would wrap every column name.
    writeln!(sink, "{}", RECORD_TABLE_HEADER.join(","))?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(sink);

    for rec in records {
        let timestamp = rec.timestamp.to_string();
        writer.write_record([
            sanitize_field(&rec.conversation_id).as_str(),
            timestamp.as_str(),
            sanitize_field(&rec.sender).as_str(),
            sanitize_field(&rec.message).as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Reads a record table file.
///
/// Rows are returned in file order. A row with a missing column or a
/// non-integer timestamp fails the whole read.
pub fn read_records(input_path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(input_path)?;
    read_records_from(file, Some(input_path))
}

/// Parses a record table from a string.
pub fn records_from_csv(content: &str) -> Result<Vec<RawRecord>> {
    read_records_from(content.as_bytes(), None)
}

fn read_records_from<R: std::io::Read>(source: R, path: Option<&Path>) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);
    let to_error = |e: csv::Error| ConvopackError::table_parse(e, path.map(Path::to_path_buf));

    let headers = reader.headers().map_err(to_error)?.clone();
    if headers.iter().ne(RECORD_TABLE_HEADER) {
        return Err(ConvopackError::invalid_format(
            "record table",
            format!(
                "expected header '{}', found '{}'",
                RECORD_TABLE_HEADER.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        ));
    }

    reader
        .deserialize::<RawRecord>()
        .map(|row| row.map_err(to_error))
        .collect()
}
