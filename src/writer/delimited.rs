//! CSV/TSV export of the long-form table.

use std::io::Write;

use crate::pipeline::LongTable;

use super::WriterError;

/// Text form of a value; NaN is written as an empty cell
fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Write `table` as delimited text with a header row
pub fn write_delimited<W: Write>(
    writer: W,
    table: &LongTable,
    delimiter: u8,
) -> Result<usize, WriterError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(table.header())?;
    for row in table.rows() {
        csv_writer.write_record([
            row.entity.as_str(),
            row.sample_type.as_str(),
            format_value(row.value).as_str(),
            row.sample.as_str(),
        ])?;
    }
    csv_writer.flush()?;

    Ok(table.len())
}
