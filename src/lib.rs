// ABOUTME: Main library entry point for the social-login flow engines
// ABOUTME: Wires protocol engines, provider adapters, and supporting modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # social-login
//!
//! Authenticate an end user against a third-party identity provider over
//! either three-legged OAuth 1.0 or the OAuth 2.0 authorization-code grant,
//! then retrieve a normalized [`models::UserInfo`] profile.
//!
//! The core is the pair of flow engines in [`flows`]; provider specifics
//! (endpoints, payload mapping, request quirks) plug in through the adapter
//! contracts in [`providers`].
//!
//! ## Flow
//!
//! 1. Resolve a provider through [`providers::registry::ProviderRegistry`].
//! 2. Redirect the user to the URI from `login_link_uri`.
//! 3. Hand the provider's callback parameters to `get_user_info`.
//!
//! One engine instance serves one authentication attempt; create it fresh per
//! login and drop it afterwards.
//!
//! ## Example
//!
//! ```rust,no_run
//! use social_login::config::ClientConfiguration;
//! use social_login::flows::CallbackParams;
//! use social_login::providers::registry::ProviderRegistry;
//! use social_login::transport::ReqwestTransport;
//! use std::sync::Arc;
//!
//! # async fn run() -> social_login::errors::AuthResult<()> {
//! let registry = ProviderRegistry::with_defaults();
//! let config = ClientConfiguration::from_env("google")?;
//! let mut flow = registry.create_flow("google", config, Arc::new(ReqwestTransport::oauth()))?;
//!
//! let login_uri = flow.login_link_uri(Some("csrf-token")).await?;
//! // ... redirect the user, then on callback:
//! let params = CallbackParams::from_query("code=4/abc&state=csrf-token");
//! let user = flow.get_user_info(&params).await?;
//! println!("signed in: {} ({})", user.first_name, user.provider_name);
//! # Ok(())
//! # }
//! ```

/// Client credential configuration
pub mod config;

/// Provider endpoint value type
pub mod endpoints;

/// Unified error taxonomy
pub mod errors;

/// OAuth 1.0 and 2.0 flow engines
pub mod flows;

/// Logging configuration and setup
pub mod logging;

/// Normalized output records
pub mod models;

/// Tolerant response-body field extraction
pub mod parsing;

/// Provider adapter contracts and registry
pub mod providers;

/// HTTP transport seam and client factories
pub mod transport;

pub use config::ClientConfiguration;
pub use errors::{AuthError, AuthResult};
pub use flows::{oauth1::Oauth1Flow, oauth2::Oauth2Flow, CallbackParams};
pub use models::{AvatarInfo, UserInfo};
pub use providers::registry::{AuthFlow, ProviderRegistry};
