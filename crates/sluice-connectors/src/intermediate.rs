//! Intermediate file convention: CSV with delimiter `|`, quote `^`, and a
//! header row.
//!
//! The unusual delimiter/quote pair sidesteps comma and double-quote
//! collisions in source data. The bulk-load statement names the same
//! convention, so files written here must stay bit-for-bit compatible with
//! [`crate::postgres::copy_statement`].

use std::path::Path;

use sluice_types::ExecutionError;

pub const DELIMITER: u8 = b'|';
pub const QUOTE: u8 = b'^';

/// Write header plus rows to `path` in the intermediate convention.
///
/// # Errors
///
/// Returns [`ExecutionError::Io`] on any write failure.
pub fn write_intermediate(
    path: &Path,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<(), ExecutionError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .from_path(path)
        .map_err(csv_io)?;

    writer.write_record(header).map_err(csv_io)?;
    for row in rows {
        writer.write_record(row).map_err(csv_io)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_io(err: csv::Error) -> ExecutionError {
    ExecutionError::Io(std::io::Error::other(err))
}
