//! Date-range selection over event sequences.

use aw_core::dates::lenient_date;
use aw_core::models::Event;
use chrono::NaiveDate;
use tracing::warn;

/// `true` when the timestamp's calendar date falls inside the closed
/// interval `[start, end]`.
///
/// The date is taken as encoded in the timestamp, without timezone
/// conversion. Unparseable timestamps are excluded with a warning rather
/// than failing the run.
pub fn is_within_range(timestamp: &str, start: NaiveDate, end: NaiveDate) -> bool {
    match lenient_date(timestamp) {
        Some(date) => start <= date && date <= end,
        None => {
            warn!("Error parsing timestamp '{}'; event excluded", timestamp);
            false
        }
    }
}

/// Keep the events whose timestamp date lies in `[start, end]`.
///
/// Events lacking a `timestamp` field are dropped silently.
pub fn filter_events_by_date(events: Vec<Event>, start: NaiveDate, end: NaiveDate) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| match event.timestamp.as_deref() {
            Some(timestamp) => is_within_range(timestamp, start, end),
            None => false,
        })
        .collect()
}
