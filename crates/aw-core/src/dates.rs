//! Date and timestamp parsing for the ActivityWatch JSON tools.
//!
//! Two distinct needs live here: strict instant parsing for the
//! consecutive-merge pass (where a bad timestamp is fatal), and forgiving
//! calendar-date parsing for CLI arguments and date-range filtering.

use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{AwError, Result};

// ── Instant parsing ───────────────────────────────────────────────────────────

/// Normalize a trailing `Z` offset to the explicit `+00:00` form.
fn normalize_offset(s: &str) -> Cow<'_, str> {
    match s.strip_suffix('Z') {
        Some(stripped) => Cow::Owned(format!("{}+00:00", stripped)),
        None => Cow::Borrowed(s),
    }
}

/// Parse an ISO-8601 timestamp with an explicit (or `Z`) UTC offset into a
/// comparable instant.
///
/// This is the strict parse used when sorting events for merging; failure
/// is an error, not a skip.
pub fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&normalize_offset(s))
        .map_err(|_| AwError::TimestampParse(s.to_string()))
}

// ── Calendar-date parsing ─────────────────────────────────────────────────────

/// Fixed date formats tried in order. `%m/%d/%Y` before `%d/%m/%Y` means an
/// ambiguous string like `01/06/2025` resolves US-style to January 6.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y%m%d"];

/// Datetime patterns accepted by the lenient fallback.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a date string in one of the fixed formats, falling back to the
/// lenient parser. Returns `None` when nothing matches.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    lenient_date(s)
}

/// Lenient calendar-date extraction from an arbitrary timestamp string.
///
/// The date is taken exactly as encoded: an offset-bearing timestamp keeps
/// the calendar date of its own offset rather than being shifted to UTC.
pub fn lenient_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalize_offset(s)) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    // Last resort: an embedded YYYY-MM-DD anywhere in the string.
    let caps = embedded_date_re().captures(s)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn embedded_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap())
}

// ── Grouping keys ─────────────────────────────────────────────────────────────

/// The `YYYY-MM-DD` day key of a timestamp string.
///
/// Relies on the ISO-8601 lexical layout; a string shorter than 10 bytes is
/// an error rather than a silently-short key.
pub fn day_key(timestamp: &str) -> Result<&str> {
    timestamp
        .get(..10)
        .ok_or_else(|| AwError::MalformedTimestamp(timestamp.to_string()))
}

/// The `HH` hour key of a timestamp string (bytes `11..13`).
pub fn hour_key(timestamp: &str) -> Result<&str> {
    timestamp
        .get(11..13)
        .ok_or_else(|| AwError::MalformedTimestamp(timestamp.to_string()))
}
