//! The event-cleaning pipeline.
//!
//! A fixed-order sequence of independently togglable passes: zero-duration
//! removal, minimum-duration removal, app exclusion, simultaneous-event
//! deduplication and consecutive-event merging. Later passes observe the
//! effect of earlier ones, so the order is part of the contract.

use std::collections::HashMap;

use aw_core::dates::parse_instant;
use aw_core::error::{AwError, Result};
use aw_core::models::Event;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Apps dropped by default: macOS system surfaces that pollute usage data.
pub const DEFAULT_EXCLUDED_APPS: &[&str] =
    &["UserNotificationCenter", "loginwindow", "CoreServicesUIAgent"];

// ── CleanConfig ───────────────────────────────────────────────────────────────

/// Configuration for [`clean_events`].
///
/// Serialized into directory-mode output as the `cleaning_options` record,
/// so field names are part of the wire format.
#[derive(Debug, Clone, Serialize)]
pub struct CleanConfig {
    /// Drop events with `duration <= 0`.
    pub remove_zero_duration: bool,
    /// Drop events shorter than this many seconds (pass disabled when `<= 0`).
    pub min_duration_seconds: f64,
    /// Drop events whose `data.app` appears in this list.
    pub exclude_apps: Vec<String>,
    /// Collapse groups of events sharing an exact timestamp string.
    pub deduplicate_simultaneous: bool,
    /// Merge consecutive same-app events separated by small gaps.
    pub merge_consecutive: bool,
    /// Largest mergeable gap, in seconds.
    pub max_gap_seconds: f64,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            remove_zero_duration: true,
            min_duration_seconds: 2.0,
            exclude_apps: DEFAULT_EXCLUDED_APPS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            deduplicate_simultaneous: true,
            merge_consecutive: true,
            max_gap_seconds: 30.0,
        }
    }
}

// ── CleanOutcome ──────────────────────────────────────────────────────────────

/// The cleaned events plus an audit log describing what each pass did.
///
/// The audit log is advisory output for humans; nothing downstream branches
/// on it.
#[derive(Debug)]
pub struct CleanOutcome {
    pub events: Vec<Event>,
    pub audit: Vec<String>,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the cleaning pipeline over `events`.
///
/// Passes execute in fixed order; each pass that changes the event count
/// appends one audit line, and the log always ends with a total-reduction
/// percentage line.
pub fn clean_events(events: Vec<Event>, config: &CleanConfig) -> Result<CleanOutcome> {
    let original_count = events.len();
    let mut filtered = events;
    let mut audit: Vec<String> = Vec::new();

    if config.remove_zero_duration {
        let before = filtered.len();
        filtered.retain(|e| e.duration > 0.0);
        let removed = before - filtered.len();
        if removed > 0 {
            audit.push(format!("Removed {} zero-duration events", removed));
        }
    }

    if config.min_duration_seconds > 0.0 {
        let before = filtered.len();
        let min = config.min_duration_seconds;
        filtered.retain(|e| e.duration >= min);
        let removed = before - filtered.len();
        if removed > 0 {
            audit.push(format!("Removed {} events shorter than {}s", removed, min));
        }
    }

    if !config.exclude_apps.is_empty() {
        let before = filtered.len();
        filtered.retain(|e| match e.app() {
            Some(app) => !config.exclude_apps.iter().any(|excluded| excluded == app),
            None => true,
        });
        let removed = before - filtered.len();
        if removed > 0 {
            audit.push(format!("Removed {} events from excluded apps", removed));
        }
    }

    if config.deduplicate_simultaneous {
        let before = filtered.len();
        filtered = deduplicate_simultaneous(filtered)?;
        let removed = before - filtered.len();
        if removed > 0 {
            audit.push(format!("Deduplicated {} simultaneous events", removed));
        }
    }

    if config.merge_consecutive {
        let before = filtered.len();
        filtered = merge_consecutive(filtered, config.max_gap_seconds)?;
        let removed = before - filtered.len();
        if removed > 0 {
            audit.push(format!("Merged {} consecutive same-app events", removed));
        }
    }

    let total_removed = original_count - filtered.len();
    let reduction_pct = if original_count > 0 {
        total_removed as f64 / original_count as f64 * 100.0
    } else {
        0.0
    };
    audit.push(format!(
        "Total reduction: {} events ({:.1}%)",
        total_removed, reduction_pct
    ));

    Ok(CleanOutcome {
        events: filtered,
        audit,
    })
}

// ── Deduplication ─────────────────────────────────────────────────────────────

/// Collapse each group of events sharing an exact timestamp string down to
/// the single event with the greatest duration.
///
/// Groups are emitted in the order their timestamp first appears in the
/// input; within a group, the first event carrying the maximum duration
/// wins ties.
fn deduplicate_simultaneous(events: Vec<Event>) -> Result<Vec<Event>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Event>> = HashMap::new();

    for event in events {
        let timestamp = event.timestamp.clone().ok_or(AwError::MissingTimestamp)?;
        let group = groups.entry(timestamp.clone()).or_default();
        if group.is_empty() {
            order.push(timestamp);
        }
        group.push(event);
    }

    let mut deduplicated = Vec::with_capacity(order.len());
    for timestamp in &order {
        let group = groups.remove(timestamp).unwrap_or_default();
        let mut best: Option<Event> = None;
        for event in group {
            match &best {
                Some(current) if event.duration > current.duration => best = Some(event),
                Some(_) => {}
                None => best = Some(event),
            }
        }
        if let Some(event) = best {
            deduplicated.push(event);
        }
    }

    Ok(deduplicated)
}

// ── Merging ───────────────────────────────────────────────────────────────────

/// Merge consecutive events from the same app separated by a gap of at
/// most `max_gap_seconds`.
///
/// Events are sorted by parsed instant first; an unparseable timestamp is
/// fatal for the whole pass. The gap check is literally `0 <= gap`, so
/// overlapping events (negative gap) are never merged. Merging extends the
/// accumulator's duration to `next_end - current_start`, absorbing the
/// gap, and adopts the next event's title when it is longer.
fn merge_consecutive(events: Vec<Event>, max_gap_seconds: f64) -> Result<Vec<Event>> {
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let mut timed: Vec<(DateTime<FixedOffset>, Event)> = Vec::with_capacity(events.len());
    for event in events {
        let timestamp = event.timestamp.as_deref().ok_or(AwError::MissingTimestamp)?;
        let instant = parse_instant(timestamp)?;
        timed.push((instant, event));
    }
    timed.sort_by_key(|(instant, _)| *instant);

    let mut merged: Vec<Event> = Vec::new();
    let mut current: Option<(DateTime<FixedOffset>, Event)> = None;

    for (next_start, next) in timed {
        let Some((start, mut event)) = current.take() else {
            current = Some((next_start, next));
            continue;
        };

        let elapsed = seconds_between(start, next_start);
        let gap = elapsed - event.duration;

        if event.app() == next.app() && (0.0..=max_gap_seconds).contains(&gap) {
            event.duration = elapsed + next.duration;
            if title_chars(&next) > title_chars(&event) {
                if let Some(title) = next.title() {
                    event.set_title(title.to_string());
                }
            }
            current = Some((start, event));
        } else {
            merged.push(event);
            current = Some((next_start, next));
        }
    }

    if let Some((_, event)) = current {
        merged.push(event);
    }

    Ok(merged)
}

/// Elapsed seconds from `a` to `b`, microsecond precision.
fn seconds_between(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> f64 {
    let delta = b.signed_duration_since(a);
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Title length in characters; a missing title counts as empty.
fn title_chars(event: &Event) -> usize {
    event.title().map(|t| t.chars().count()).unwrap_or(0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
