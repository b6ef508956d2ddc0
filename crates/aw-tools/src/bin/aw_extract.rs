//! Extract bucket-export events inside a date range to a JSON file.
//!
//! Unlike the stream tools this one writes pretty-printed files and
//! reports progress as human-readable text on stdout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use aw_core::error::AwError;
use aw_core::models::Event;
use aw_data::date_filter::filter_events_by_date;
use aw_data::reader::{find_json_files, read_document, write_pretty_json};
use aw_tools::cli::parse_date_range;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde_json::{Map, Value};

/// Extract ActivityWatch data within a specified date range
#[derive(Parser, Debug)]
#[command(name = "aw-extract", version)]
struct Args {
    /// ActivityWatch JSON export file (not used with -d/--directory)
    filename: Option<PathBuf>,

    /// Process all JSON files in the specified directory
    #[arg(long, short = 'd')]
    directory: Option<PathBuf>,

    /// Start date (YYYY-MM-DD, MM/DD/YYYY, ...)
    #[arg(long, short = 's')]
    start: String,

    /// End date (YYYY-MM-DD, MM/DD/YYYY, ...)
    #[arg(long, short = 'e')]
    end: String,

    /// Output filename (single-file mode only)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

/// Identifying fields of the first bucket in an export.
struct BucketMeta {
    id: String,
    bucket_type: String,
    client: String,
    hostname: String,
    created: String,
}

fn string_field(bucket: &Value, key: &str) -> String {
    bucket
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Load a bucket-format export, returning the first bucket's metadata and
/// events.
fn load_bucket_export(path: &Path) -> Result<(BucketMeta, Vec<Event>)> {
    let data = read_document(Some(path))?;
    let Some(buckets) = data.get("buckets").and_then(Value::as_object) else {
        bail!(
            "File '{}' doesn't appear to be an ActivityWatch export",
            path.display()
        );
    };
    let Some((_, bucket)) = buckets.iter().next() else {
        bail!("File '{}' contains no buckets", path.display());
    };

    let meta = BucketMeta {
        id: string_field(bucket, "id"),
        bucket_type: string_field(bucket, "type"),
        client: string_field(bucket, "client"),
        hostname: string_field(bucket, "hostname"),
        created: string_field(bucket, "created"),
    };
    let events = match bucket.get("events") {
        Some(events) => serde_json::from_value(events.clone())?,
        None => Vec::new(),
    };
    Ok((meta, events))
}

/// Rebuild the original export structure around the filtered events.
fn build_output(
    meta: &BucketMeta,
    events: &[Event],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Value> {
    let mut bucket = Map::new();
    bucket.insert("id".into(), Value::String(meta.id.clone()));
    bucket.insert("created".into(), Value::String(meta.created.clone()));
    bucket.insert("name".into(), Value::Null);
    bucket.insert("type".into(), Value::String(meta.bucket_type.clone()));
    bucket.insert("client".into(), Value::String(meta.client.clone()));
    bucket.insert("hostname".into(), Value::String(meta.hostname.clone()));
    bucket.insert("data".into(), Value::Object(Map::new()));
    bucket.insert("events".into(), serde_json::to_value(events)?);

    let mut buckets = Map::new();
    buckets.insert(meta.id.clone(), Value::Object(bucket));

    Ok(serde_json::json!({
        "buckets": buckets,
        "extraction_info": {
            "original_total_events": events.len(),
            "date_range": {
                "start": start.to_string(),
                "end": end.to_string(),
            },
            "extracted_at": Utc::now().to_rfc3339(),
        }
    }))
}

fn default_output_path(input: &Path, start: NaiveDate, end: NaiveDate) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    PathBuf::from("output").join(format!("filtered_{}_{}_{}.json", stem, start, end))
}

/// Extract one file's events for the date range. Returns `true` when an
/// output file was written.
fn process_single_file(
    path: &Path,
    start: NaiveDate,
    end: NaiveDate,
    output: Option<&Path>,
) -> Result<bool> {
    println!("\nProcessing: {}", path.display());

    let (meta, all_events) = load_bucket_export(path)?;
    println!("Bucket type: {}", meta.bucket_type);
    println!("Client: {}", meta.client);
    println!("Hostname: {}", meta.hostname);
    println!("Total entries in file: {}", all_events.len());

    let filtered = filter_events_by_date(all_events, start, end);
    println!("Entries matching date range: {}", filtered.len());

    if filtered.is_empty() {
        println!("No entries found in the specified date range.");
        return Ok(false);
    }

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(path, start, end),
    };

    let output_data = build_output(&meta, &filtered, start, end)?;
    write_pretty_json(&output_path, &output_data)?;

    println!("Filtered data saved to: {}", output_path.display());
    if let Ok(metadata) = std::fs::metadata(&output_path) {
        println!("File size: {:.1} KB", metadata.len() as f64 / 1024.0);
    }
    Ok(true)
}

fn main() -> Result<()> {
    aw_tools::bootstrap::setup_logging();
    let args = Args::parse();

    let (start, end) = parse_date_range(&args.start, &args.end)?;

    if args.filename.is_none() && args.directory.is_none() {
        bail!("You must specify either a filename or use -d/--directory");
    }
    if args.filename.is_some() && args.directory.is_some() {
        return Err(AwError::InputConflict.into());
    }

    println!("ActivityWatch Date Range Extractor");
    println!("Date range: {} to {}", start, end);

    if let Some(directory) = &args.directory {
        let json_files = find_json_files(directory)?;
        println!(
            "Found {} JSON files in directory: {}",
            json_files.len(),
            directory.display()
        );

        let mut successful = 0usize;
        for path in &json_files {
            match process_single_file(path, start, end, None) {
                Ok(true) => successful += 1,
                Ok(false) => {}
                Err(e) => eprintln!("Error processing {}: {}", path.display(), e),
            }
        }

        println!("\nSUMMARY: Processed {} files", json_files.len());
        println!("Successfully extracted data from {} files", successful);
        println!(
            "Files with no matching entries: {}",
            json_files.len() - successful
        );
    } else if let Some(filename) = &args.filename {
        process_single_file(filename, start, end, args.output.as_deref())?;
    }

    println!("\nExtraction complete!");
    Ok(())
}
