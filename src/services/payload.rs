use serde_json::{Map, Value};

use crate::dci::ApiResponse;
use crate::error::Result;

/// Decodes a list response and pulls out its items (see [`items`]).
pub fn decode_items(response: ApiResponse, key: &str) -> Result<Vec<Value>> {
    Ok(items(response.into_payload()?, key))
}

/// Pulls the item list out of a list payload.
///
/// Objects yield the array stored under `key`, arrays are taken as the list
/// itself, anything else yields nothing.
pub fn items(payload: Value, key: &str) -> Vec<Value> {
    match payload {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// A single-entity payload, with JSON `null` meaning "nothing".
pub fn entity(payload: Value) -> Option<Value> {
    match payload {
        Value::Null => None,
        other => Some(other),
    }
}

/// Total reported in a list payload's `_meta.count`.
pub fn count(payload: &Value) -> Option<u64> {
    payload.get("_meta")?.get("count")?.as_u64()
}

/// Keeps only `fields` of each item.
///
/// Missing fields come back as `null`. An empty field list keeps no items at
/// all, which is how callers ask for a count without the payload.
pub fn project(items: Vec<Value>, fields: &[String]) -> Vec<Value> {
    if fields.is_empty() {
        return Vec::new();
    }

    items
        .into_iter()
        .map(|item| {
            let projected: Map<String, Value> = fields
                .iter()
                .map(|field| {
                    let value = item.get(field).cloned().unwrap_or(Value::Null);
                    (field.clone(), value)
                })
                .collect();
            Value::Object(projected)
        })
        .collect()
}
