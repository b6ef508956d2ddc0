//! Combine ActivityWatch exports, clean them, and save a flat event list.
//!
//! The one-shot companion to the stream tools: loads several bucket-format
//! exports, tags events with bucket/device provenance, runs the full
//! cleaning pipeline, prints the audit trail and a human summary, and
//! writes the cleaned events with metadata to a single file.

use std::path::PathBuf;

use anyhow::Result;
use aw_data::analyzer::analyze_events;
use aw_data::cleaner::{clean_events, CleanConfig};
use aw_data::extractor::{device_from_bucket, extract_events};
use aw_data::reader::{read_document, write_pretty_json};
use aw_data::reporter::summary_report;
use chrono::Utc;
use clap::Parser;
use tracing::warn;

/// Clean ActivityWatch data exports
#[derive(Parser, Debug)]
#[command(name = "aw-dedupe", version)]
struct Args {
    /// Input ActivityWatch JSON export files
    #[arg(required = true)]
    input_files: Vec<PathBuf>,

    /// Output file path
    #[arg(long, short = 'o', default_value = "cleaned_activity_data.json")]
    output: PathBuf,

    /// Minimum event duration in seconds
    #[arg(long, default_value_t = 2.0)]
    min_duration: f64,

    /// Maximum gap for merging consecutive events, in seconds
    #[arg(long, default_value_t = 30.0)]
    max_gap: f64,

    /// Disable merging of consecutive events
    #[arg(long)]
    no_merge: bool,
}

fn main() -> Result<()> {
    aw_tools::bootstrap::setup_logging();
    let args = Args::parse();

    let config = CleanConfig {
        min_duration_seconds: args.min_duration,
        max_gap_seconds: args.max_gap,
        merge_consecutive: !args.no_merge,
        ..CleanConfig::default()
    };

    // Load and combine all inputs, tagging each bucket event with the
    // device derived from its bucket name.
    let mut all_events = Vec::new();
    for path in &args.input_files {
        match read_document(Some(path)).and_then(|data| extract_events(&data)) {
            Ok(mut events) => {
                for event in &mut events {
                    if let Some(bucket) = &event.bucket {
                        event.device = Some(device_from_bucket(bucket));
                    }
                }
                println!("Loaded {} events from {}", events.len(), path.display());
                all_events.extend(events);
            }
            Err(e) => warn!("Error loading {}: {}", path.display(), e),
        }
    }

    println!(
        "\nLoaded {} total events from {} files",
        all_events.len(),
        args.input_files.len()
    );

    let outcome = clean_events(all_events, &config)?;

    println!("\nCleaning steps:");
    for (i, step) in outcome.audit.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }

    let analysis = analyze_events(&outcome.events)?;
    let report = summary_report(&analysis, 5);

    println!("\n=== SUMMARY ===");
    println!("Total events: {}", analysis.total_events);
    println!(
        "Total active time: {:.1} hours",
        analysis.total_duration / 3600.0
    );

    println!("\nTop 5 apps by time:");
    for entry in &report.top_apps {
        println!(
            "  {}: {:.1}h ({} events)",
            entry.app,
            entry.duration / 3600.0,
            entry.events
        );
    }

    println!("\nDaily breakdown:");
    for day in &report.daily_breakdown {
        println!(
            "  {}: {:.1}h ({} events)",
            day.date,
            day.duration / 3600.0,
            day.events
        );
    }

    let cleaned_count = outcome.events.len();
    let output_data = serde_json::json!({
        "metadata": {
            "cleaned_at": Utc::now().to_rfc3339(),
            "total_events": cleaned_count,
            "config": config,
        },
        "events": outcome.events,
    });
    write_pretty_json(&args.output, &output_data)?;

    println!(
        "\nSaved {} cleaned events to {}",
        cleaned_count,
        args.output.display()
    );

    Ok(())
}
