// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Provider endpoint value type

/// An immutable pairing of a base URI and a resource path.
///
/// Adapters construct one per access; the user-info endpoint in particular may
/// vary with data captured mid-flow (e.g. a discovered profile URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_uri: String,
    resource_path: String,
}

impl Endpoint {
    /// Create an endpoint from a base URI and a resource path
    #[must_use]
    pub fn new(base_uri: impl Into<String>, resource_path: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            resource_path: resource_path.into(),
        }
    }

    /// Base URI component
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Resource path component
    #[must_use]
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Absolute URI: exact concatenation of base and path, no added separators
    #[must_use]
    pub fn uri(&self) -> String {
        format!("{}{}", self.base_uri, self.resource_path)
    }
}
