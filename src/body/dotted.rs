//! Dotted-path helpers for nested example bodies.
//!
//! [`set_dotted`] writes a value at `a.b.c` (a `*` segment means index `0`)
//! into an object tree, [`finalize`] turns objects keyed `0..n` into arrays,
//! and [`flatten`] walks a finished tree back into dotted keys.

use serde_json::{Map, Value};

/// Write `value` at the dotted `key`, creating containers on the way.
///
/// Any non-object met while descending is replaced by an empty object.
pub fn set_dotted(root: &mut Map<String, Value>, key: &str, value: Value) {
    let segments: Vec<&str> = key
        .split('.')
        .map(|s| if s == "*" { "0" } else { s })
        .collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value);
}

/// Convert every object whose keys are exactly `"0"`, `"1"`, ... in order
/// into an array, recursively. Empty objects become empty arrays.
pub fn finalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sequential = map.keys().enumerate().all(|(i, k)| *k == i.to_string());
            if sequential {
                Value::Array(map.into_iter().map(|(_, v)| finalize(v)).collect())
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, finalize(v))).collect())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(finalize).collect()),
        other => other,
    }
}

/// Dotted keys with numeric indices for every leaf, in tree order.
///
/// Empty arrays and objects are leaves.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(value, "", &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Vec<(String, Value)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                descend(v, join(k), out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                descend(v, join(&i.to_string()), out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}

fn descend(value: &Value, key: String, out: &mut Vec<(String, Value)>) {
    let is_empty_container = match value {
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => true,
    };
    if is_empty_container {
        out.push((key, value.clone()));
    } else {
        flatten_into(value, &key, out);
    }
}

/// Rule key for a flattened key: numeric segments after the first become `*`.
pub fn wildcard_key(key: &str) -> String {
    key.split('.')
        .enumerate()
        .map(|(i, segment)| {
            if i > 0 && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "*"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
