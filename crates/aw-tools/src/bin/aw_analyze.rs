//! Analyze activity events and emit statistics or a summary report.
//!
//! Flattens events out of any recognised input shape, aggregates them, and
//! prints the full analysis or a bounded top-N summary as one JSON line.

use std::path::PathBuf;

use anyhow::Result;
use aw_data::analyzer::analyze_events;
use aw_data::extractor::extract_events;
use aw_data::reader::{find_json_files, read_document};
use aw_data::reporter::summary_report;
use aw_tools::cli::{check_input_conflict, emit_line};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full grouped statistics
    Full,
    /// Bounded top-N report
    Summary,
}

/// Analyze ActivityWatch events and generate reports
#[derive(Parser, Debug)]
#[command(name = "aw-analyze", version)]
struct Args {
    /// Input JSON file (stdin if not provided)
    input_file: Option<PathBuf>,

    /// Process all JSON files in a directory
    #[arg(long, short = 'd')]
    directory: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Full)]
    format: OutputFormat,

    /// Number of top items to show in the summary
    #[arg(long, default_value_t = 10)]
    top: usize,
}

/// One output line per processed file in directory mode.
#[derive(Serialize)]
struct FileOutput {
    source_file: String,
    analysis: Value,
}

fn analyze_document(data: &Value, format: OutputFormat, top: usize) -> aw_core::error::Result<Value> {
    let events = extract_events(data)?;
    let analysis = analyze_events(&events)?;
    let result = match format {
        OutputFormat::Summary => serde_json::to_value(summary_report(&analysis, top))?,
        OutputFormat::Full => serde_json::to_value(&analysis)?,
    };
    Ok(result)
}

fn main() -> Result<()> {
    aw_tools::bootstrap::setup_logging();
    let args = Args::parse();
    check_input_conflict(&args.input_file, &args.directory)?;

    if let Some(directory) = &args.directory {
        for path in find_json_files(directory)? {
            let result = read_document(Some(&path))
                .and_then(|data| analyze_document(&data, args.format, args.top));
            match result {
                Ok(analysis) => emit_line(&FileOutput {
                    source_file: path.display().to_string(),
                    analysis,
                })?,
                Err(e) => warn!("Error processing {}: {}", path.display(), e),
            }
        }
        return Ok(());
    }

    let data = read_document(args.input_file.as_deref())?;
    emit_line(&analyze_document(&data, args.format, args.top)?)?;

    Ok(())
}
