//! Argument handling shared across the tool binaries.

use std::path::PathBuf;

use aw_core::dates::parse_date;
use aw_core::error::{AwError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Reject the mutually-exclusive input-file / `--directory` combination.
///
/// Checked manually rather than through clap so the violation exits with
/// code 1 like every other input error.
pub fn check_input_conflict(
    input_file: &Option<PathBuf>,
    directory: &Option<PathBuf>,
) -> Result<()> {
    if input_file.is_some() && directory.is_some() {
        return Err(AwError::InputConflict);
    }
    Ok(())
}

/// Parse a `--start`/`--end` argument, failing with the offending string.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    parse_date(s).ok_or_else(|| AwError::InvalidDate(s.to_string()))
}

/// Parse and validate a `--start`/`--end` pair before any data is read.
pub fn parse_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_date_arg(start)?;
    let end = parse_date_arg(end)?;
    if start > end {
        return Err(AwError::StartAfterEnd);
    }
    Ok((start, end))
}

/// Print a value as one compact JSON line on stdout.
pub fn emit_line<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
