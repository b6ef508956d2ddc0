//! Shape-preserving transforms over whole JSON documents.
//!
//! The clean and filter tools rewrite event lists *inside* whatever shape
//! they were given: a raw list stays a list, an `{"events": ...}` object
//! keeps its sibling keys, a bucket-format document is rebuilt bucket by
//! bucket, and an unrecognized shape passes through untouched.

use aw_core::error::Result;
use aw_core::models::Event;
use serde_json::{Map, Value};

/// Apply `transform` to every event list in `data`, preserving the input
/// document shape.
pub fn transform_document<F>(data: Value, mut transform: F) -> Result<Value>
where
    F: FnMut(Vec<Event>) -> Result<Vec<Event>>,
{
    let obj = match data {
        Value::Array(_) => {
            let events: Vec<Event> = serde_json::from_value(data)?;
            return Ok(serde_json::to_value(transform(events)?)?);
        }
        Value::Object(obj) => obj,
        other => return Ok(other),
    };

    if obj.contains_key("buckets") {
        let mut out_buckets = Map::new();
        if let Some(Value::Object(buckets)) = obj.get("buckets") {
            for (name, bucket) in buckets {
                let mut out_bucket = bucket.clone();
                if let Some(events_val) = bucket.get("events") {
                    let events: Vec<Event> = serde_json::from_value(events_val.clone())?;
                    let transformed = serde_json::to_value(transform(events)?)?;
                    if let Some(b) = out_bucket.as_object_mut() {
                        b.insert("events".to_string(), transformed);
                    }
                }
                out_buckets.insert(name.clone(), out_bucket);
            }
        }
        let mut out = Map::new();
        out.insert("buckets".to_string(), Value::Object(out_buckets));
        return Ok(Value::Object(out));
    }

    if let Some(events_val) = obj.get("events").cloned() {
        let events: Vec<Event> = serde_json::from_value(events_val)?;
        let transformed = serde_json::to_value(transform(events)?)?;
        let mut out = obj;
        out.insert("events".to_string(), transformed);
        return Ok(Value::Object(out));
    }

    Ok(Value::Object(obj))
}
