//! Event extraction from heterogeneous JSON input shapes.
//!
//! Inputs arrive as a raw event list, `{"events": [...]}`,
//! `{"buckets": {name: {"events": [...]}}}`, or any of those wrapped in a
//! `{"data": ...}` envelope. All of them normalize to one flat event
//! sequence.

use aw_core::error::Result;
use aw_core::models::Event;
use serde_json::Value;

/// How many `{"data": ...}` envelope levels are unwrapped before giving up.
/// Observed inputs nest at most once.
const MAX_ENVELOPE_DEPTH: usize = 2;

/// Normalize any recognised input shape into a flat event sequence.
///
/// * a JSON array is the event sequence itself;
/// * an object with an `events` key contributes that list;
/// * an object with a `buckets` key contributes every bucket's events in
///   encoded bucket order, each event tagged with its bucket name;
/// * an object with a `data` key is unwrapped (bounded depth) and retried;
/// * anything else yields an empty sequence, not an error.
pub fn extract_events(data: &Value) -> Result<Vec<Event>> {
    extract_at_depth(data, 0)
}

fn extract_at_depth(data: &Value, depth: usize) -> Result<Vec<Event>> {
    if data.is_array() {
        return Ok(serde_json::from_value(data.clone())?);
    }

    let Some(obj) = data.as_object() else {
        return Ok(Vec::new());
    };

    if let Some(events) = obj.get("events") {
        return Ok(serde_json::from_value(events.clone())?);
    }

    if let Some(buckets) = obj.get("buckets") {
        let mut all: Vec<Event> = Vec::new();
        if let Some(buckets) = buckets.as_object() {
            for (bucket_name, bucket) in buckets {
                let Some(events) = bucket.get("events") else {
                    continue;
                };
                let parsed: Vec<Event> = serde_json::from_value(events.clone())?;
                for mut event in parsed {
                    event.bucket = Some(bucket_name.clone());
                    all.push(event);
                }
            }
        }
        return Ok(all);
    }

    if let Some(inner) = obj.get("data") {
        if depth < MAX_ENVELOPE_DEPTH {
            return extract_at_depth(inner, depth + 1);
        }
        return Ok(Vec::new());
    }

    Ok(Vec::new())
}

/// Derive a device tag from a bucket name.
///
/// Bucket names conventionally end in `_<hostname>`; the trailing segment
/// (minus any `.local` suffix) is the device. Names without an underscore
/// map to `"unknown"`.
pub fn device_from_bucket(bucket_name: &str) -> String {
    match bucket_name.rsplit_once('_') {
        Some((_, last)) => last.replace(".local", ""),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Raw list ──────────────────────────────────────────────────────────────

    #[test]
    fn test_extract_raw_list() {
        let data = json!([
            {"timestamp": "2025-06-01T10:00:00+00:00", "duration": 60.0},
            {"timestamp": "2025-06-01T11:00:00+00:00", "duration": 30.0},
        ]);
        let events = extract_events(&data).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].duration, 60.0);
        assert!(events[0].bucket.is_none());
    }

    // ── events key ────────────────────────────────────────────────────────────

    #[test]
    fn test_extract_events_key() {
        let data = json!({"events": [{"timestamp": "2025-06-01T10:00:00+00:00"}]});
        let events = extract_events(&data).unwrap();
        assert_eq!(events.len(), 1);
    }

    // ── buckets key ───────────────────────────────────────────────────────────

    #[test]
    fn test_extract_buckets_tags_bucket_name() {
        let data = json!({
            "buckets": {
                "aw-watcher-window_host": {
                    "events": [{"timestamp": "2025-06-01T10:00:00+00:00", "duration": 5.0}]
                }
            }
        });
        let events = extract_events(&data).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bucket.as_deref(), Some("aw-watcher-window_host"));
    }

    #[test]
    fn test_extract_buckets_preserves_encoded_order() {
        // Keys deliberately out of alphabetical order.
        let data = serde_json::from_str::<Value>(
            r#"{"buckets": {
                "zz-first": {"events": [{"duration": 1.0}]},
                "aa-second": {"events": [{"duration": 2.0}]}
            }}"#,
        )
        .unwrap();
        let events = extract_events(&data).unwrap();
        assert_eq!(events[0].bucket.as_deref(), Some("zz-first"));
        assert_eq!(events[1].bucket.as_deref(), Some("aa-second"));
    }

    #[test]
    fn test_extract_buckets_skips_bucket_without_events() {
        let data = json!({
            "buckets": {
                "meta-only": {"id": "meta-only"},
                "with-events": {"events": [{"duration": 1.0}]}
            }
        });
        let events = extract_events(&data).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_extract_buckets_does_not_mutate_input() {
        let data = json!({
            "buckets": {"b_host": {"events": [{"duration": 1.0}]}}
        });
        let _ = extract_events(&data).unwrap();
        // The source document must not have grown a bucket tag.
        assert!(data["buckets"]["b_host"]["events"][0].get("bucket").is_none());
    }

    // ── data envelope ─────────────────────────────────────────────────────────

    #[test]
    fn test_extract_unwraps_single_envelope() {
        let data = json!({"data": {"events": [{"duration": 1.0}]}});
        let events = extract_events(&data).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_extract_unwraps_double_envelope() {
        let data = json!({"data": {"data": {"events": [{"duration": 1.0}]}}});
        let events = extract_events(&data).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_extract_envelope_depth_is_bounded() {
        let data = json!({"data": {"data": {"data": {"events": [{"duration": 1.0}]}}}});
        let events = extract_events(&data).unwrap();
        assert!(events.is_empty());
    }

    // ── Unrecognized shapes ───────────────────────────────────────────────────

    #[test]
    fn test_extract_unrecognized_object_is_empty() {
        let data = json!({"something": "else"});
        assert!(extract_events(&data).unwrap().is_empty());
    }

    #[test]
    fn test_extract_scalar_is_empty() {
        assert!(extract_events(&json!(42)).unwrap().is_empty());
        assert!(extract_events(&json!(null)).unwrap().is_empty());
    }

    // ── device_from_bucket ────────────────────────────────────────────────────

    #[test]
    fn test_device_from_bucket_strips_local_suffix() {
        assert_eq!(
            device_from_bucket("aw-watcher-window_Messier4.local"),
            "Messier4"
        );
    }

    #[test]
    fn test_device_from_bucket_plain_hostname() {
        assert_eq!(device_from_bucket("aw-watcher-web-brave_laptop"), "laptop");
    }

    #[test]
    fn test_device_from_bucket_no_underscore() {
        assert_eq!(device_from_bucket("nounderscore"), "unknown");
    }
}
