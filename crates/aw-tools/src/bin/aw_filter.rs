//! Filter activity events by date range from a JSON input stream.
//!
//! Keeps events whose timestamp date falls inside the inclusive
//! `--start`/`--end` interval, preserving the input document shape.

use std::path::PathBuf;

use anyhow::Result;
use aw_data::date_filter::filter_events_by_date;
use aw_data::document::transform_document;
use aw_data::reader::{find_json_files, read_document};
use aw_tools::cli::{check_input_conflict, emit_line, parse_date_range};
use clap::Parser;
use serde::Serialize;
use tracing::warn;

/// Filter ActivityWatch events by date range
#[derive(Parser, Debug)]
#[command(name = "aw-filter", version)]
struct Args {
    /// Input JSON file (stdin if not provided)
    input_file: Option<PathBuf>,

    /// Process all JSON files in a directory
    #[arg(long, short = 'd')]
    directory: Option<PathBuf>,

    /// Start date (YYYY-MM-DD, MM/DD/YYYY, ...)
    #[arg(long, short = 's')]
    start: String,

    /// End date (YYYY-MM-DD, MM/DD/YYYY, ...)
    #[arg(long, short = 'e')]
    end: String,
}

#[derive(Serialize)]
struct RangeOutput {
    start: String,
    end: String,
}

/// One output line per processed file in directory mode.
#[derive(Serialize)]
struct FileOutput {
    source_file: String,
    date_range: RangeOutput,
    data: serde_json::Value,
}

fn main() -> Result<()> {
    aw_tools::bootstrap::setup_logging();
    let args = Args::parse();
    check_input_conflict(&args.input_file, &args.directory)?;
    let (start, end) = parse_date_range(&args.start, &args.end)?;

    if let Some(directory) = &args.directory {
        for path in find_json_files(directory)? {
            let result = read_document(Some(&path)).and_then(|data| {
                transform_document(data, |events| Ok(filter_events_by_date(events, start, end)))
            });
            match result {
                Ok(filtered) => emit_line(&FileOutput {
                    source_file: path.display().to_string(),
                    date_range: RangeOutput {
                        start: start.to_string(),
                        end: end.to_string(),
                    },
                    data: filtered,
                })?,
                Err(e) => warn!("Error processing {}: {}", path.display(), e),
            }
        }
        return Ok(());
    }

    let data = read_document(args.input_file.as_deref())?;
    let filtered =
        transform_document(data, |events| Ok(filter_events_by_date(events, start, end)))?;
    emit_line(&filtered)?;

    Ok(())
}
