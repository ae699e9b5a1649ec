// ABOUTME: Protocol flow engines driving OAuth 1.0 and OAuth 2.0 logins
// ABOUTME: Holds the shared callback-parameter multimap and response verification
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Flow Engines
//!
//! One engine instance drives one authentication attempt for one user: the
//! hosting application asks for a login URI, redirects the user, and hands the
//! provider's callback parameters back to the same instance. Instances carry
//! mutable token state and must never be shared between attempts or called
//! concurrently.

pub mod oauth1;
pub mod oauth2;

use crate::errors::{AuthError, AuthResult};
use crate::transport::HttpResponse;
use std::collections::HashMap;

/// Multimap of callback parameters the provider redirected back with
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    values: HashMap<String, Vec<String>>,
}

impl CallbackParams {
    /// Empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse parameters from a raw query string (without the leading `?`)
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.insert(key.into_owned(), value.into_owned());
        }
        params
    }

    /// Append a value for a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// First value for a key
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First non-empty value for a key
    #[must_use]
    pub fn first_non_empty(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|value| !value.is_empty())
    }
}

/// Reject empty bodies and non-success statuses.
pub(crate) fn verify_response(response: &HttpResponse) -> AuthResult<()> {
    if !response.is_success() || response.body.trim().is_empty() {
        return Err(AuthError::UnexpectedResponse {
            status: response.status,
            body: response.body.clone(),
        });
    }
    Ok(())
}
