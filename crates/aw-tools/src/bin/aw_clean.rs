//! Clean and deduplicate activity events from a JSON input stream.
//!
//! Reads JSON from stdin or a file, writes cleaned JSON to stdout,
//! preserving the input document shape. Composes with the other tools:
//!
//! ```text
//! cat data.json | aw-filter -s 2025-06-01 -e 2025-06-07 | aw-clean | aw-analyze
//! ```

use std::path::PathBuf;

use anyhow::Result;
use aw_data::cleaner::{clean_events, CleanConfig, DEFAULT_EXCLUDED_APPS};
use aw_data::document::transform_document;
use aw_data::reader::{find_json_files, read_document};
use aw_tools::cli::{check_input_conflict, emit_line};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

/// Clean and deduplicate ActivityWatch events
#[derive(Parser, Debug)]
#[command(name = "aw-clean", version)]
struct Args {
    /// Input JSON file (stdin if not provided)
    input_file: Option<PathBuf>,

    /// Process all JSON files in a directory
    #[arg(long, short = 'd')]
    directory: Option<PathBuf>,

    /// Minimum event duration in seconds
    #[arg(long, default_value_t = 2.0)]
    min_duration: f64,

    /// Maximum gap for merging consecutive events, in seconds
    #[arg(long, default_value_t = 30.0)]
    max_gap: f64,

    /// Disable merging of consecutive events
    #[arg(long)]
    no_merge: bool,

    /// Disable deduplication of simultaneous events
    #[arg(long)]
    no_dedupe: bool,

    /// Keep zero-duration events
    #[arg(long)]
    keep_zero_duration: bool,

    /// Apps to exclude (defaults to system apps)
    #[arg(long, num_args = 0.., value_name = "APP",
          default_values_t = DEFAULT_EXCLUDED_APPS.iter().map(|s| s.to_string()))]
    exclude_apps: Vec<String>,
}

impl Args {
    fn clean_config(&self) -> CleanConfig {
        CleanConfig {
            remove_zero_duration: !self.keep_zero_duration,
            min_duration_seconds: self.min_duration,
            exclude_apps: self.exclude_apps.clone(),
            deduplicate_simultaneous: !self.no_dedupe,
            merge_consecutive: !self.no_merge,
            max_gap_seconds: self.max_gap,
        }
    }
}

/// One output line per processed file in directory mode.
#[derive(Serialize)]
struct FileOutput<'a> {
    source_file: String,
    cleaning_options: &'a CleanConfig,
    data: serde_json::Value,
}

fn main() -> Result<()> {
    aw_tools::bootstrap::setup_logging();
    let args = Args::parse();
    check_input_conflict(&args.input_file, &args.directory)?;

    let config = args.clean_config();

    if let Some(directory) = &args.directory {
        for path in find_json_files(directory)? {
            let result = read_document(Some(&path)).and_then(|data| {
                transform_document(data, |events| {
                    let outcome = clean_events(events, &config)?;
                    for line in &outcome.audit {
                        info!("{}: {}", path.display(), line);
                    }
                    Ok(outcome.events)
                })
            });
            match result {
                Ok(cleaned) => emit_line(&FileOutput {
                    source_file: path.display().to_string(),
                    cleaning_options: &config,
                    data: cleaned,
                })?,
                Err(e) => warn!("Error processing {}: {}", path.display(), e),
            }
        }
        return Ok(());
    }

    let data = read_document(args.input_file.as_deref())?;
    let cleaned = transform_document(data, |events| {
        let outcome = clean_events(events, &config)?;
        for line in &outcome.audit {
            info!("{}", line);
        }
        Ok(outcome.events)
    })?;
    emit_line(&cleaned)?;

    Ok(())
}
