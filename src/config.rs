// ABOUTME: Client credential configuration for provider registrations
// ABOUTME: Loads client id/secret/scope from the environment in the server's convention
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Client Configuration
//!
//! One [`ClientConfiguration`] per registered provider, supplied at engine
//! construction and never mutated afterwards. Credentials come either from the
//! hosting application directly or from environment variables named after the
//! provider (`GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, ...).

use crate::errors::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};

/// Immutable per-provider client credentials and flow settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfiguration {
    /// OAuth client identifier (consumer key under OAuth 1.0)
    pub client_id: String,
    /// OAuth client secret (consumer secret under OAuth 1.0)
    pub client_secret: String,
    /// Optional public key, for providers that sign with one
    pub client_public_key: Option<String>,
    /// Scope string to request; empty means "provider default"
    pub scope: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Whether this client is enabled for login
    pub enabled: bool,
    /// Provider type name this configuration belongs to
    pub type_name: String,
}

impl ClientConfiguration {
    /// Load configuration for the named provider from environment variables.
    ///
    /// Reads `<NAME>_CLIENT_ID`, `<NAME>_CLIENT_SECRET`, `<NAME>_REDIRECT_URI`
    /// and optional `<NAME>_SCOPE`, with `NAME` uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when a required variable is absent.
    pub fn from_env(provider: &str) -> AuthResult<Self> {
        let prefix = provider.to_uppercase();
        let require = |suffix: &str| {
            std::env::var(format!("{prefix}_{suffix}"))
                .map_err(|_| AuthError::Config(format!("{prefix}_{suffix} not set")))
        };

        let config = Self {
            client_id: require("CLIENT_ID")?,
            client_secret: require("CLIENT_SECRET")?,
            client_public_key: std::env::var(format!("{prefix}_CLIENT_PUBLIC_KEY")).ok(),
            scope: std::env::var(format!("{prefix}_SCOPE")).unwrap_or_default(),
            redirect_uri: require("REDIRECT_URI")?,
            enabled: true,
            type_name: provider.to_owned(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the enabled-client invariant: id, secret and redirect URI must
    /// all be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] naming the first empty field.
    pub fn validate(&self) -> AuthResult<()> {
        if !self.enabled {
            return Ok(());
        }
        for (value, name) in [
            (&self.client_id, "client_id"),
            (&self.client_secret, "client_secret"),
            (&self.redirect_uri, "redirect_uri"),
        ] {
            if value.is_empty() {
                return Err(AuthError::Config(format!(
                    "{name} must be non-empty for enabled client {}",
                    self.type_name
                )));
            }
        }
        Ok(())
    }
}
