//! Conversions between `Value`, `serde_json::Value` and serde types.

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use fsstore_core::{Error, Result, Value};

/// Extension tag reported by conversion errors that involve no file format.
const VALUE_TAG: &str = "value";

/// Convert a `Value` into a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value_to_json(&value))
        .map_err(|e| Error::serialization(VALUE_TAG, e.to_string()))
}

/// Convert a Rust type into a `Value` via serde.
pub fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value> {
    serde_json::to_value(data)
        .map(json_to_value)
        .map_err(|e| Error::serialization(VALUE_TAG, e.to_string()))
}

/// Render a `Value` as JSON for display.
///
/// JSON has no byte strings, so `Bytes` become base64 text. Non-finite
/// floats have no JSON form and become `null`; use [`try_value_to_json`]
/// where that loss must be an error.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    render_json(value, &|_| Ok(serde_json::Value::Null)).unwrap_or(serde_json::Value::Null)
}

/// Render a `Value` as JSON, failing on floats JSON cannot represent
/// (NaN and the infinities).
pub fn try_value_to_json(value: &Value) -> Result<serde_json::Value> {
    render_json(value, &|f| {
        Err(Error::serialization(
            "json",
            format!("non-finite float {f} has no JSON representation"),
        ))
    })
}

fn render_json(
    value: &Value,
    non_finite: &dyn Fn(f64) -> Result<serde_json::Value>,
) -> Result<serde_json::Value> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(number) => serde_json::Value::Number(number),
            None => non_finite(*f)?,
        },
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => {
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| render_json(item, non_finite))
                .collect::<Result<_>>()?,
        ),
        Value::Map(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), render_json(v, non_finite)?)))
                .collect::<Result<_>>()?,
        ),
    };

    Ok(json)
}

/// Convert parsed JSON into a `Value`.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(f)) => Value::Float(f),
            // u64 beyond i64::MAX
            (None, None) => Value::String(n.to_string()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(json_to_value).collect())
        }
        serde_json::Value::Object(fields) => Value::Map(
            fields
                .into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}
