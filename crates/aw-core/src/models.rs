use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single timestamped, duration-bearing activity record.
///
/// Events arrive as loosely-shaped JSON objects; everything beyond the
/// well-known fields is kept in open maps so unknown keys survive a
/// clean/filter round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// ISO-8601 timestamp text, compared and grouped as a string.
    ///
    /// Grouping relies on the lexical layout: the first 10 bytes are the
    /// `YYYY-MM-DD` day key and bytes `11..13` the `HH` hour key. Only the
    /// consecutive-merge pass parses it as a real instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Duration in seconds; absent in the input means 0.
    #[serde(default)]
    pub duration: f64,

    /// Open attribute map. `app`, `title`, `url` and `hostname` are the
    /// conventional keys; anything else passes through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,

    /// Source bucket name, set when events are flattened out of a
    /// bucket-format document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Originating device, when present natively or tagged downstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Unknown top-level keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// The `data.app` string, when present.
    pub fn app(&self) -> Option<&str> {
        self.data.get("app").and_then(Value::as_str)
    }

    /// The `data.title` string, when present.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }

    /// The `data.url` string; presence marks this as a web event.
    pub fn url(&self) -> Option<&str> {
        self.data.get("url").and_then(Value::as_str)
    }

    /// The `data.hostname` string, when present.
    pub fn hostname(&self) -> Option<&str> {
        self.data.get("hostname").and_then(Value::as_str)
    }

    /// Overwrite (or insert) the `data.title` string.
    pub fn set_title(&mut self, title: String) {
        self.data.insert("title".to_string(), Value::String(title));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Deserialization defaults ──────────────────────────────────────────────

    #[test]
    fn test_event_minimal_object() {
        let event: Event = serde_json::from_str("{}").unwrap();
        assert!(event.timestamp.is_none());
        assert_eq!(event.duration, 0.0);
        assert!(event.data.is_empty());
        assert!(event.bucket.is_none());
        assert!(event.device.is_none());
    }

    #[test]
    fn test_event_full_object() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 42.5,
            "data": {"app": "Firefox", "title": "Docs", "url": "https://example.com"},
        }))
        .unwrap();
        assert_eq!(event.timestamp.as_deref(), Some("2025-06-01T10:00:00+00:00"));
        assert_eq!(event.duration, 42.5);
        assert_eq!(event.app(), Some("Firefox"));
        assert_eq!(event.title(), Some("Docs"));
        assert_eq!(event.url(), Some("https://example.com"));
        assert_eq!(event.hostname(), None);
    }

    // ── Unknown-key passthrough ───────────────────────────────────────────────

    #[test]
    fn test_event_round_trips_unknown_keys() {
        let input = serde_json::json!({
            "timestamp": "2025-06-01T10:00:00+00:00",
            "duration": 1.0,
            "id": 17,
            "custom": {"nested": true},
        });
        let event: Event = serde_json::from_value(input).unwrap();
        assert_eq!(event.extra.get("id"), Some(&serde_json::json!(17)));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back.get("id"), Some(&serde_json::json!(17)));
        assert_eq!(back.get("custom"), Some(&serde_json::json!({"nested": true})));
    }

    #[test]
    fn test_event_serialization_skips_absent_fields() {
        let event: Event = serde_json::from_str("{\"duration\": 3.0}").unwrap();
        let back = serde_json::to_value(&event).unwrap();
        let obj = back.as_object().unwrap();
        assert!(!obj.contains_key("timestamp"));
        assert!(!obj.contains_key("data"));
        assert!(!obj.contains_key("bucket"));
        assert!(!obj.contains_key("device"));
    }

    // ── set_title ─────────────────────────────────────────────────────────────

    #[test]
    fn test_set_title_inserts_into_empty_data() {
        let mut event: Event = serde_json::from_str("{}").unwrap();
        event.set_title("Long window title".to_string());
        assert_eq!(event.title(), Some("Long window title"));
    }
}
