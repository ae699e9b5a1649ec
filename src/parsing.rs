// ABOUTME: Tolerant field extraction from provider response bodies
// ABOUTME: Accepts JSON objects and urlencoded forms without the caller knowing which
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Response Parsing
//!
//! Token endpoints are inconsistent about encoding: most providers return a
//! JSON object, some (GitHub, older OAuth 1.0 endpoints) return an
//! `application/x-www-form-urlencoded` body. [`extract_field`] tries a strict
//! JSON parse first and falls back to query-string decoding, so callers never
//! branch on the format. A missing key is `None` in both paths; the caller
//! decides whether absence is fatal.

use serde_json::Value;

/// Extract a named top-level field from a JSON or urlencoded response body.
///
/// JSON strings yield their content, JSON numbers and booleans their display
/// form (`expires_in` is frequently a bare number). Nested objects and nulls
/// yield `None`.
#[must_use]
pub fn extract_field(body: &str, key: &str) -> Option<String> {
    if let Some(value) = serde_json::from_str::<Value>(body).ok().as_ref() {
        return json_field(value, key);
    }
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn json_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extract a field and treat empty values as absent.
#[must_use]
pub fn extract_non_empty_field(body: &str, key: &str) -> Option<String> {
    extract_field(body, key).filter(|value| !value.is_empty())
}
