// ABOUTME: Startup-time registry mapping provider keys to adapter factories
// ABOUTME: Resolves a provider name into a ready-to-run flow engine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Provider Registry
//!
//! An explicit map from provider key to adapter constructor, built once at
//! startup. Resolution is a plain lookup, never a runtime type search.
//! [`ProviderRegistry::create_flow`] pairs the adapter with a fresh engine
//! instance for one authentication attempt.

use super::{Oauth1AdapterFactory, Oauth2AdapterFactory};
use crate::config::ClientConfiguration;
use crate::errors::{AuthError, AuthResult};
use crate::flows::oauth1::Oauth1Flow;
use crate::flows::oauth2::Oauth2Flow;
use crate::flows::CallbackParams;
use crate::models::UserInfo;
use crate::transport::HttpTransport;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Adapter constructor tagged with the protocol variant it serves
#[derive(Clone, Copy)]
pub enum AdapterFactory {
    /// OAuth 2.0 authorization-code provider
    OAuth2(Oauth2AdapterFactory),
    /// Three-legged OAuth 1.0 provider
    OAuth1(Oauth1AdapterFactory),
}

/// Registry of provider adapters known to the application
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl ProviderRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the bundled adapters enabled by feature
    /// flags
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        #[cfg(feature = "provider-google")]
        registry.register(
            super::google::NAME,
            AdapterFactory::OAuth2(super::google::GoogleAdapter::create),
        );
        #[cfg(feature = "provider-github")]
        registry.register(
            super::github::NAME,
            AdapterFactory::OAuth2(super::github::GithubAdapter::create),
        );
        #[cfg(feature = "provider-fitbit")]
        registry.register(
            super::fitbit::NAME,
            AdapterFactory::OAuth2(super::fitbit::FitbitAdapter::create),
        );
        #[cfg(feature = "provider-twitter")]
        registry.register(
            super::twitter::NAME,
            AdapterFactory::OAuth1(super::twitter::TwitterAdapter::create),
        );
        registry
    }

    /// Register an adapter factory under a provider key
    pub fn register(&mut self, name: &str, factory: AdapterFactory) {
        info!("registering login provider: {name}");
        self.factories.insert(name.to_owned(), factory);
    }

    /// Whether a provider key is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered provider keys
    #[must_use]
    pub fn list_providers(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Create a flow engine for one authentication attempt against the named
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when the provider is unknown or the
    /// configuration fails validation.
    pub fn create_flow(
        &self,
        name: &str,
        config: ClientConfiguration,
        transport: Arc<dyn HttpTransport>,
    ) -> AuthResult<AuthFlow> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AuthError::Config(format!("provider {name} is not registered")))?;

        match factory {
            AdapterFactory::OAuth2(create) => Ok(AuthFlow::OAuth2(Oauth2Flow::new(
                create(&config),
                config,
                transport,
            )?)),
            AdapterFactory::OAuth1(create) => Ok(AuthFlow::OAuth1(Oauth1Flow::new(
                create(&config),
                config,
                transport,
            )?)),
        }
    }
}

/// One login attempt, protocol variant resolved by the registry.
///
/// Hosting applications drive either protocol through the same two calls:
/// redirect the user to [`AuthFlow::login_link_uri`], then hand the callback
/// parameters to [`AuthFlow::get_user_info`].
pub enum AuthFlow {
    /// OAuth 2.0 authorization-code flow
    OAuth2(Oauth2Flow),
    /// Three-legged OAuth 1.0 flow
    OAuth1(Oauth1Flow),
}

impl std::fmt::Debug for AuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuth2(_) => f.write_str("AuthFlow::OAuth2"),
            Self::OAuth1(_) => f.write_str("AuthFlow::OAuth1"),
        }
    }
}

impl AuthFlow {
    /// Provider name from the adapter
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OAuth2(flow) => flow.name(),
            Self::OAuth1(flow) => flow.name(),
        }
    }

    /// CSRF state echo; always `None` for OAuth 1.0
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::OAuth2(flow) => flow.state(),
            Self::OAuth1(flow) => flow.state(),
        }
    }

    /// Build the login URI the user should be redirected to.
    ///
    /// # Errors
    ///
    /// Protocol-specific; see [`Oauth2Flow::login_link_uri`] and
    /// [`Oauth1Flow::login_link_uri`].
    pub async fn login_link_uri(&mut self, state: Option<&str>) -> AuthResult<String> {
        match self {
            Self::OAuth2(flow) => flow.login_link_uri(state),
            Self::OAuth1(flow) => flow.login_link_uri(state).await,
        }
    }

    /// Complete the login from the provider callback.
    ///
    /// # Errors
    ///
    /// Protocol-specific; see [`Oauth2Flow::get_user_info`] and
    /// [`Oauth1Flow::get_user_info`].
    pub async fn get_user_info(&mut self, params: &CallbackParams) -> AuthResult<UserInfo> {
        match self {
            Self::OAuth2(flow) => flow.get_user_info(params).await,
            Self::OAuth1(flow) => flow.get_user_info(params).await,
        }
    }
}
