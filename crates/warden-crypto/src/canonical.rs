//! Canonical JSON encoding.
//!
//! Object keys are emitted in sorted order at every depth and no whitespace is
//! written, so two semantically equal values always produce the same bytes
//! regardless of how the map was built.

use serde_json::Value;

/// Encode `value` as canonical JSON bytes.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use warden_crypto::canonical_json;
///
/// let a = canonical_json(&json!({"b": 1, "a": [true, null]}));
/// assert_eq!(a, br#"{"a":[true,null],"b":1}"#);
/// ```
#[must_use]
pub fn canonical_json(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_scalar(&Value::String(key.clone()), out);
                out.push(b':');
                if let Some(child) = map.get(key) {
                    write_value(child, out);
                }
            }
            out.push(b'}');
        },
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        },
        scalar => write_scalar(scalar, out),
    }
}

fn write_scalar(value: &Value, out: &mut Vec<u8>) {
    // Scalars serialize deterministically; serde_json cannot fail on a Value.
    if let Ok(bytes) = serde_json::to_vec(value) {
        out.extend_from_slice(&bytes);
    }
}
