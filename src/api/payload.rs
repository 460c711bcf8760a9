//! Request bodies for result writes.
//!
//! Bodies are JSON (`{"value": 5}`) or XML (`<result><value>5</value></result>`),
//! picked from `Content-Type`. Only the `value` field is read.

use axum::http::{header, HeaderMap};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::error::ApiError;

/// Body accepted by POST and PUT
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValueRequest {
    #[schema(example = 100)]
    pub value: i32,
}

#[derive(Debug, Deserialize)]
struct XmlValue {
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueField {
    Missing,
    Invalid(String),
    Present(i32),
}

impl ValueField {
    /// The integer value, or 422 when it is missing or not an integer.
    pub fn require(self) -> Result<i32, ApiError> {
        match self {
            ValueField::Present(v) => Ok(v),
            ValueField::Missing => Err(ApiError::unprocessable_entity(
                "Unprocessable Content: field 'value' is required",
            )),
            ValueField::Invalid(raw) => Err(ApiError::unprocessable_entity(format!(
                "Unprocessable Content: '{raw}' is not an integer value"
            ))),
        }
    }
}

fn is_xml(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.contains("xml"))
}

fn parse_text(raw: &str) -> ValueField {
    match raw.trim().parse::<i32>() {
        Ok(v) => ValueField::Present(v),
        Err(_) => ValueField::Invalid(raw.to_string()),
    }
}

fn from_json(value: &Value) -> ValueField {
    match value {
        Value::Null => ValueField::Missing,
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(ValueField::Present)
            .unwrap_or_else(|| ValueField::Invalid(n.to_string())),
        Value::String(s) => parse_text(s),
        other => ValueField::Invalid(other.to_string()),
    }
}

/// Extracts the `value` field from a request body. Malformed bodies are 400.
pub fn value_field(headers: &HeaderMap, body: &[u8]) -> Result<ValueField, ApiError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| ApiError::bad_request("Request body is not valid UTF-8"))?;

    if text.trim().is_empty() {
        return Ok(ValueField::Missing);
    }

    if is_xml(headers) {
        let parsed: XmlValue = quick_xml::de::from_str(text)
            .map_err(|e| ApiError::bad_request(format!("Malformed XML body: {e}")))?;
        return Ok(parsed.value.as_deref().map_or(ValueField::Missing, parse_text));
    }

    let parsed: Value = serde_json::from_str(text)
        .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {e}")))?;

    Ok(match parsed {
        Value::Object(map) => map.get("value").map_or(ValueField::Missing, from_json),
        _ => ValueField::Missing,
    })
}
