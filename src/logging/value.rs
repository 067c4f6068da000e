//! Structural equality over attribute values.
use serde_json::{Number, Value};

use super::entry::Attributes;

/// Compare two attribute values structurally.
///
/// Integers compare exactly. When either side is a float both are compared
/// as `f64`, so `1` equals `1.0`. Lists compare
/// element-wise in order. Maps compare by key set and per-key value,
/// ignoring key order. Values of different kinds are never equal.
#[must_use]
pub fn structurally_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if !a.is_f64() && !b.is_f64() {
        // A negative i64 against a u64 above i64::MAX.
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Return `true` if every key in `expected` is present in `actual` with a
/// structurally equal value. Extra keys in `actual` are ignored.
#[must_use]
pub fn is_subset(expected: &Attributes, actual: &Attributes) -> bool {
    expected.iter().all(|(key, value)| {
        actual
            .get(key)
            .is_some_and(|candidate| structurally_equal(value, candidate))
    })
}

/// Convert a JSON value into attributes.
///
/// Objects become the attribute map, `null` becomes an empty map, and any
/// other value is stored under the `value` key.
#[must_use]
pub fn into_attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        Value::Null => Attributes::new(),
        other => {
            let mut map = Attributes::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
