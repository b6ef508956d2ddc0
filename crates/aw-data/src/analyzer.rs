//! Aggregation of event sequences into grouped usage statistics.

use std::collections::HashMap;

use aw_core::dates::{day_key, hour_key};
use aw_core::error::{AwError, Result};
use aw_core::formatting::format_duration;
use aw_core::models::Event;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ── Slots ─────────────────────────────────────────────────────────────────────

/// Running totals for one grouping key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSlot {
    /// Accumulated duration in seconds.
    pub duration: f64,
    /// Number of contributing events.
    pub events: u64,
}

impl UsageSlot {
    fn add(&mut self, event: &Event) {
        self.duration += event.duration;
        self.events += 1;
    }
}

/// Running totals for one URL, keeping the longest title seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UrlSlot {
    pub duration: f64,
    pub events: u64,
    pub title: String,
}

// ── Grouping ──────────────────────────────────────────────────────────────────

/// An insertion-ordered map from grouping key to accumulator slot.
///
/// Encounter order is load-bearing: the summary reporter's stable sort
/// keeps it as the tie-break order, and serialized output lists keys in
/// the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct Grouping<S> {
    entries: Vec<(String, S)>,
    index: HashMap<String, usize>,
}

impl<S: Default> Grouping<S> {
    /// The slot for `key`, created on first use.
    pub fn slot_mut(&mut self, key: &str) -> &mut S {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), S::default()));
                let i = self.entries.len() - 1;
                self.index.insert(key.to_string(), i);
                i
            }
        };
        &mut self.entries[idx].1
    }

    /// The slot for `key`, if any event contributed to it.
    pub fn get(&self, key: &str) -> Option<&S> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Key/slot pairs in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Serialize> Serialize for Grouping<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, slot) in &self.entries {
            map.serialize_entry(key, slot)?;
        }
        map.end()
    }
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Lexical first/last timestamps of the analyzed events. Serializes as an
/// empty object when no event carried a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Grouped statistics over an event sequence.
///
/// Every grouping is a total partition of the input: summing a grouping's
/// durations reproduces `total_duration`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub total_events: usize,
    pub total_duration: f64,
    pub total_duration_formatted: String,
    pub apps: Grouping<UsageSlot>,
    pub devices: Grouping<UsageSlot>,
    pub daily: Grouping<UsageSlot>,
    pub hourly: Grouping<UsageSlot>,
    pub urls: Grouping<UrlSlot>,
    pub date_range: DateRange,
}

/// Aggregate `events` into an [`Analysis`].
///
/// Grouping keys: `data.app` (default `"Unknown"`), the `device` tag with
/// `data.hostname` then `"Unknown"` as fallbacks, the `YYYY-MM-DD` and `HH`
/// slices of the timestamp, and `data.url` (web events only, longest title
/// retained). A missing or too-short timestamp is fatal here, unlike in
/// date filtering where it merely excludes the event.
pub fn analyze_events(events: &[Event]) -> Result<Analysis> {
    // Explicit fast path: downstream percentage math divides by the total.
    if events.is_empty() {
        return Ok(Analysis {
            total_duration_formatted: format_duration(0.0),
            ..Analysis::default()
        });
    }

    let mut analysis = Analysis {
        total_events: events.len(),
        ..Analysis::default()
    };

    for event in events {
        analysis.total_duration += event.duration;

        let app = event.app().unwrap_or("Unknown");
        analysis.apps.slot_mut(app).add(event);

        let device = event
            .device
            .as_deref()
            .or_else(|| event.hostname())
            .unwrap_or("Unknown");
        analysis.devices.slot_mut(device).add(event);

        let timestamp = event.timestamp.as_deref().ok_or(AwError::MissingTimestamp)?;
        analysis.daily.slot_mut(day_key(timestamp)?).add(event);
        analysis.hourly.slot_mut(hour_key(timestamp)?).add(event);

        if let Some(url) = event.url() {
            let title = event.title().unwrap_or("Unknown Title");
            let slot = analysis.urls.slot_mut(url);
            slot.duration += event.duration;
            slot.events += 1;
            if title.chars().count() > slot.title.chars().count() {
                slot.title = title.to_string();
            }
        }

        let range = &mut analysis.date_range;
        if range.start.as_deref().map(|s| timestamp < s).unwrap_or(true) {
            range.start = Some(timestamp.to_string());
        }
        if range.end.as_deref().map(|e| timestamp > e).unwrap_or(true) {
            range.end = Some(timestamp.to_string());
        }
    }

    analysis.total_duration_formatted = format_duration(analysis.total_duration);
    Ok(analysis)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_event(timestamp: &str, duration: f64, app: &str) -> Event {
        serde_json::from_value(json!({
            "timestamp": timestamp,
            "duration": duration,
            "data": {"app": app},
        }))
        .unwrap()
    }

    // ── Empty input ───────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_empty_input() {
        let analysis = analyze_events(&[]).unwrap();
        assert_eq!(analysis.total_events, 0);
        assert_eq!(analysis.total_duration, 0.0);
        assert_eq!(analysis.total_duration_formatted, "0.0s");
        assert!(analysis.apps.is_empty());
        assert!(analysis.urls.is_empty());
        assert_eq!(analysis.date_range, DateRange::default());
    }

    // ── App grouping ──────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_groups_by_app() {
        let events = vec![
            make_event("2025-06-01T10:00:00+00:00", 60.0, "Safari"),
            make_event("2025-06-01T11:00:00+00:00", 30.0, "Safari"),
            make_event("2025-06-01T12:00:00+00:00", 10.0, "Terminal"),
        ];
        let analysis = analyze_events(&events).unwrap();

        assert_eq!(analysis.total_events, 3);
        assert_eq!(analysis.total_duration, 100.0);
        let safari = analysis.apps.get("Safari").unwrap();
        assert_eq!(safari.duration, 90.0);
        assert_eq!(safari.events, 2);
        assert_eq!(analysis.apps.get("Terminal").unwrap().events, 1);
    }

    #[test]
    fn test_analyze_missing_app_is_unknown() {
        let events = vec![serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 5.0,
        }))
        .unwrap()];
        let analysis = analyze_events(&events).unwrap();
        assert_eq!(analysis.apps.get("Unknown").unwrap().events, 1);
    }

    #[test]
    fn test_analyze_apps_partition_total_duration() {
        let events = vec![
            make_event("2025-06-01T10:00:00+00:00", 12.5, "A"),
            make_event("2025-06-01T11:00:00+00:00", 7.25, "B"),
            make_event("2025-06-02T09:00:00+00:00", 80.0, "A"),
        ];
        let analysis = analyze_events(&events).unwrap();
        let sum: f64 = analysis.apps.iter().map(|(_, slot)| slot.duration).sum();
        assert!((sum - analysis.total_duration).abs() < 1e-9);
    }

    // ── Device grouping ───────────────────────────────────────────────────────

    #[test]
    fn test_analyze_device_fallback_chain() {
        let tagged: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 1.0,
            "device": "laptop",
            "data": {"hostname": "ignored"},
        }))
        .unwrap();
        let hostname_only: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:01:00+00:00",
            "duration": 1.0,
            "data": {"hostname": "desktop"},
        }))
        .unwrap();
        let untagged: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:02:00+00:00",
            "duration": 1.0,
        }))
        .unwrap();

        let analysis = analyze_events(&[tagged, hostname_only, untagged]).unwrap();
        assert_eq!(analysis.devices.get("laptop").unwrap().events, 1);
        assert_eq!(analysis.devices.get("desktop").unwrap().events, 1);
        assert_eq!(analysis.devices.get("Unknown").unwrap().events, 1);
    }

    // ── Daily / hourly grouping ───────────────────────────────────────────────

    #[test]
    fn test_analyze_daily_and_hourly_keys() {
        let events = vec![
            make_event("2025-06-01T10:00:00+00:00", 60.0, "A"),
            make_event("2025-06-01T10:30:00+00:00", 30.0, "A"),
            make_event("2025-06-02T23:00:00+00:00", 10.0, "A"),
        ];
        let analysis = analyze_events(&events).unwrap();

        assert_eq!(analysis.daily.get("2025-06-01").unwrap().events, 2);
        assert_eq!(analysis.daily.get("2025-06-02").unwrap().events, 1);
        assert_eq!(analysis.hourly.get("10").unwrap().duration, 90.0);
        assert_eq!(analysis.hourly.get("23").unwrap().events, 1);
    }

    #[test]
    fn test_analyze_missing_timestamp_is_fatal() {
        let event: Event = serde_json::from_value(json!({"duration": 5.0})).unwrap();
        assert!(matches!(
            analyze_events(&[event]),
            Err(AwError::MissingTimestamp)
        ));
    }

    #[test]
    fn test_analyze_short_timestamp_is_fatal() {
        let event: Event = serde_json::from_value(json!({
            "timestamp": "2025-06",
            "duration": 5.0,
        }))
        .unwrap();
        assert!(matches!(
            analyze_events(&[event]),
            Err(AwError::MalformedTimestamp(_))
        ));
    }

    // ── URL grouping ──────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_urls_only_web_events() {
        let web: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 60.0,
            "data": {"url": "https://example.com", "title": "Example"},
        }))
        .unwrap();
        let window = make_event("2025-06-01T11:00:00+00:00", 30.0, "Safari");

        let analysis = analyze_events(&[web, window]).unwrap();
        assert_eq!(analysis.urls.len(), 1);
        let slot = analysis.urls.get("https://example.com").unwrap();
        assert_eq!(slot.duration, 60.0);
        assert_eq!(slot.title, "Example");
    }

    #[test]
    fn test_analyze_urls_keep_longest_title() {
        let short: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 10.0,
            "data": {"url": "https://example.com", "title": "Ex"},
        }))
        .unwrap();
        let long: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T11:00:00+00:00",
            "duration": 10.0,
            "data": {"url": "https://example.com", "title": "Example - full title"},
        }))
        .unwrap();

        let analysis = analyze_events(&[short, long]).unwrap();
        let slot = analysis.urls.get("https://example.com").unwrap();
        assert_eq!(slot.title, "Example - full title");
        assert_eq!(slot.events, 2);
    }

    #[test]
    fn test_analyze_url_without_title_defaults() {
        let event: Event = serde_json::from_value(json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 10.0,
            "data": {"url": "https://example.com"},
        }))
        .unwrap();
        let analysis = analyze_events(&[event]).unwrap();
        assert_eq!(
            analysis.urls.get("https://example.com").unwrap().title,
            "Unknown Title"
        );
    }

    // ── Date range ────────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_date_range_lexical_min_max() {
        let events = vec![
            make_event("2025-06-03T10:00:00+00:00", 1.0, "A"),
            make_event("2025-06-01T09:00:00+00:00", 1.0, "A"),
            make_event("2025-06-02T12:00:00+00:00", 1.0, "A"),
        ];
        let analysis = analyze_events(&events).unwrap();
        assert_eq!(
            analysis.date_range.start.as_deref(),
            Some("2025-06-01T09:00:00+00:00")
        );
        assert_eq!(
            analysis.date_range.end.as_deref(),
            Some("2025-06-03T10:00:00+00:00")
        );
    }

    // ── Serialization ─────────────────────────────────────────────────────────

    #[test]
    fn test_analysis_serializes_groupings_in_encounter_order() {
        let events = vec![
            make_event("2025-06-01T10:00:00+00:00", 1.0, "Zebra"),
            make_event("2025-06-01T11:00:00+00:00", 1.0, "Alpha"),
        ];
        let analysis = analyze_events(&events).unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.find("Zebra").unwrap() < json.find("Alpha").unwrap());
    }

    #[test]
    fn test_analysis_empty_date_range_serializes_as_empty_object() {
        let analysis = analyze_events(&[]).unwrap();
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["date_range"], json!({}));
    }
}
