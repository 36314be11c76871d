//! Primitive type coercion.

use serde_json::Value;

use crate::schema::FieldType;

use super::error::FormatError;
use super::value::FieldValue;

/// JSON kind name, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce a raw value to a primitive field type.
///
/// Strings accept any scalar. Integers accept integral numbers, truncate
/// fractional ones and parse decimal strings. Floats accept numbers and
/// numeric strings but never NaN or infinity.
pub(crate) fn coerce(raw: &Value, ty: FieldType) -> Result<FieldValue, FormatError> {
    match ty {
        FieldType::String => coerce_string(raw).map(FieldValue::Str),
        FieldType::Integer => coerce_integer(raw).map(FieldValue::Int),
        FieldType::Float => coerce_float(raw).map(FieldValue::Float),
    }
}

pub(crate) fn coerce_string(raw: &Value) -> Result<String, FormatError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(FormatError::WrongType {
            expected: "string",
            found: json_kind(other),
        }),
    }
}

fn coerce_integer(raw: &Value) -> Result<i64, FormatError> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.as_f64()
                .filter(|f| f.is_finite() && f.trunc().abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| FormatError::Unparseable {
                    input: n.to_string(),
                    expected: "integer",
                })
        }
        Value::String(s) => s.trim().parse().map_err(|_| FormatError::Unparseable {
            input: s.clone(),
            expected: "integer",
        }),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(FormatError::WrongType {
            expected: "integer",
            found: json_kind(other),
        }),
    }
}

fn coerce_float(raw: &Value) -> Result<f64, FormatError> {
    let unparseable = |input: String| FormatError::Unparseable {
        input,
        expected: "float",
    };

    match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| unparseable(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| unparseable(s.clone())),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(FormatError::WrongType {
            expected: "float",
            found: json_kind(other),
        }),
    }
}

/// Length of the raw value for bounds checks.
///
/// Bounds apply to the submitted value, not the coerced one. Only strings
/// (in characters), arrays and objects have a length.
pub(crate) fn raw_len(raw: &Value) -> Option<usize> {
    match raw {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}
