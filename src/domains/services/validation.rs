//! Shared input validation helpers.
//!
//! Every resource validates its input completely before touching a store.
//! The helpers here cover the checks that recur across resources: required
//! and optional text fields, lenient number parsing and id path segments.
//! Resource-specific rules live next to each resource in `definitions/`.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::{ServiceError, ServiceResult};

/// A JSON object body, as accepted by every create/update endpoint.
pub type JsonMap = Map<String, Value>;

/// Read a required string field, trimmed and non-empty.
///
/// `message` is returned verbatim when the field is missing, not a string or
/// blank.
pub fn required_text(body: &JsonMap, field: &str, message: &str) -> ServiceResult<String> {
    match body.get(field).and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ServiceError::validation(message)),
    }
}

/// Read an optional string field.
///
/// Missing and `null` yield `None`; any other non-string is rejected. The
/// returned text is trimmed and may be empty.
pub fn optional_text(body: &JsonMap, field: &str) -> ServiceResult<Option<String>> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
        Some(_) => Err(ServiceError::validation(format!(
            "Field '{field}' must be a string."
        ))),
    }
}

/// Optional text with a fallback for missing or blank values.
pub fn text_or_default(body: &JsonMap, field: &str, default: &str) -> ServiceResult<String> {
    Ok(optional_text(body, field)?
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| default.to_string()))
}

/// Parse a JSON number or numeric string as a finite `f64`.
pub fn parse_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Parse a JSON integer, integral float or numeric string as an `i64`.
pub fn parse_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parse an `{id}` path segment.
///
/// Non-numeric ids can never match a record, so they are reported as
/// "not found" rather than as a validation failure.
pub fn parse_id(raw: &str, resource: &str) -> ServiceResult<u64> {
    raw.parse::<u64>()
        .map_err(|_| ServiceError::not_found(format!("{resource} with id {raw} not found.")))
}

/// A non-empty query parameter.
pub fn query_param<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Lift query parameters into a JSON object of strings.
///
/// Lets endpoints that accept both query strings and JSON bodies share one
/// validator.
pub fn query_to_json(query: HashMap<String, String>) -> JsonMap {
    query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}
