use std::sync::Arc;

use crate::{ExactNumber, Value};

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(num) => {
                if let Some(u) = num.as_u64() {
                    Value::Uint(u)
                } else if let Some(i) = num.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float {
                        value: num.as_f64().unwrap_or(f64::NAN),
                        sig_digits: 0,
                    }
                }
            }
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(old) => old.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(old) => {
                let entries = old
                    .into_iter()
                    .map(|(k, v)| (k.into(), Value::from(v)))
                    .collect();
                Value::object_from_entries(entries)
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Uint(u) => serde_json::Value::from(*u),
            Value::Int(i) => serde_json::Value::from(*i),
            // Non-finite floats have no serde_json number and become null.
            Value::Float { value, .. } => serde_json::Number::from_f64(*value)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Exact(number) => exact_to_serde(number),
            Value::String(s) => serde_json::Value::String(s.as_ref().to_owned()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.as_ref().to_owned(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Exact numbers narrow to an integer when they fit, and otherwise
/// round to the closest float.
fn exact_to_serde(number: &Arc<ExactNumber>) -> serde_json::Value {
    if number.fits_u64() {
        serde_json::Value::from(number.as_u64())
    } else if number.fits_i64() {
        serde_json::Value::from(number.as_i64())
    } else {
        serde_json::Number::from_f64(number.as_f64())
            .map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

impl PartialEq<serde_json::Value> for Value {
    fn eq(&self, other: &serde_json::Value) -> bool {
        eq(other, self)
    }
}

impl PartialEq<Value> for serde_json::Value {
    fn eq(&self, other: &Value) -> bool {
        eq(self, other)
    }
}

fn eq(lhs: &serde_json::Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (serde_json::Value::Null, Value::Null) => true,
        (serde_json::Value::Bool(l), Value::Bool(r)) => l == r,
        (serde_json::Value::Number(l), r) => compare_number(l, r),
        (serde_json::Value::String(l), Value::String(r)) => l.as_bytes() == r.as_bytes(),
        (serde_json::Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r.iter()).all(|(l, r)| eq(l, r))
        }
        (serde_json::Value::Object(l), Value::Object(r)) => {
            if l.len() != r.len() {
                return false;
            }
            // NOTE: Map from `serde_json` is expected to be `BTreeMap` as this
            // comparison depends on both sides iterating in key order.
            l.iter()
                .zip(r.iter())
                .all(|((lk, lv), (rk, rv))| lk.as_bytes() == rk.as_bytes() && eq(lv, rv))
        }
        _ => false,
    }
}

fn compare_number(lhs: &serde_json::Number, rhs: &Value) -> bool {
    match rhs {
        Value::Uint(u) => lhs.as_u64() == Some(*u),
        Value::Int(i) => lhs.as_i64() == Some(*i),
        Value::Float { value, .. } => lhs.as_f64() == Some(*value),
        Value::Exact(number) => match &exact_to_serde(number) {
            serde_json::Value::Number(converted) => converted == lhs,
            _ => false,
        },
        _ => false,
    }
}
