// ABOUTME: Unified error taxonomy for OAuth flow engines and provider adapters
// ABOUTME: Defines terminal failure kinds surfaced to hosting applications
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Error Handling
//!
//! Every failure in a flow is terminal for that attempt: the engines never retry
//! internally, and recovery (retry, re-authenticate) belongs to the hosting
//! application. Errors name the offending field or carry the raw provider
//! response rather than collapsing into a vague generic failure.

use thiserror::Error;

/// Result alias used throughout the crate
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised by the flow engines and provider adapters
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider signaled an authorization error through the callback
    /// parameters. Raised before any network call is made.
    #[error("provider signaled an error in the callback: {0}")]
    Protocol(String),

    /// A required field was missing or empty in a provider response
    #[error("provider response is missing required field \"{0}\"")]
    MissingField(&'static str),

    /// The provider returned an empty body or a non-success status
    #[error("unexpected provider response (status {status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code of the offending response
        status: u16,
        /// Raw response body, kept for caller diagnostics
        body: String,
    },

    /// The caller requested a capability the selected protocol variant
    /// cannot provide (e.g. CSRF state under OAuth 1.0)
    #[error("{0} is not supported by this protocol variant")]
    NotSupported(&'static str),

    /// The client configuration is incomplete or inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// The underlying HTTP transport failed before a response was obtained
    #[error("transport error: {0}")]
    Transport(String),

    /// A provider adapter failed on a structurally malformed user-info
    /// payload; propagated unchanged
    #[error("failed to parse user info payload: {0}")]
    UserInfoParse(#[source] anyhow::Error),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
