// ABOUTME: Provider adapter contracts consumed by the generic flow engines
// ABOUTME: Defines endpoint suppliers, user-info parsing, and customization hooks
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Provider Adapters
//!
//! A provider adapter supplies what the generic engines cannot know: endpoint
//! URIs, the mapping from the provider's profile payload to [`UserInfo`], and
//! optional hooks for providers with nonstandard requests. Adapters hold no
//! protocol state; everything mutable lives in the engine's session.
//!
//! Hooks are plain function-valued fields with no-op defaults, injected at
//! adapter construction. They receive the in-flight request plus a read-only
//! [`HookContext`], and may rewrite the form body, change the authentication
//! scheme, or capture side-channel data into the session's extra map.

pub mod registry;

#[cfg(feature = "provider-fitbit")]
pub mod fitbit;
#[cfg(feature = "provider-github")]
pub mod github;
#[cfg(feature = "provider-google")]
pub mod google;
#[cfg(feature = "provider-twitter")]
pub mod twitter;

use crate::config::ClientConfiguration;
use crate::endpoints::Endpoint;
use crate::errors::AuthResult;
use crate::models::UserInfo;
use crate::transport::{HttpRequest, HttpResponse};
use std::collections::HashMap;

/// Read-only view handed to request hooks
pub struct HookContext<'a> {
    /// Client configuration of the running flow
    pub config: &'a ClientConfiguration,
    /// Access token, once the flow holds one
    pub access_token: Option<&'a str>,
    /// Side-channel data captured earlier in the flow
    pub extra: &'a HashMap<String, String>,
}

/// Hook rewriting an outgoing request
pub type RequestHook = Box<dyn Fn(&mut HttpRequest, &HookContext<'_>) + Send + Sync>;

/// Hook observing a token response before it is parsed; may capture fields
/// into the session's extra map
pub type ResponseHook = Box<dyn Fn(&HttpResponse, &mut HashMap<String, String>) + Send + Sync>;

/// Optional per-adapter flow customizations, default no-op
#[derive(Default)]
pub struct FlowHooks {
    /// May replace the access-token request entirely (parameters and
    /// authentication scheme)
    pub before_get_access_token: Option<RequestHook>,
    /// Runs on the verified token response before field parsing
    pub after_get_access_token: Option<ResponseHook>,
    /// May replace the user-info authentication mechanism; when set, the
    /// OAuth2 engine does not attach the token as a query parameter
    pub before_get_user_info: Option<RequestHook>,
}

impl std::fmt::Debug for FlowHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowHooks")
            .field(
                "before_get_access_token",
                &self.before_get_access_token.is_some(),
            )
            .field(
                "after_get_access_token",
                &self.after_get_access_token.is_some(),
            )
            .field("before_get_user_info", &self.before_get_user_info.is_some())
            .finish()
    }
}

/// Contract for OAuth 2.0 authorization-code providers
pub trait Oauth2Adapter: Send + Sync {
    /// Provider name, stamped onto every returned profile
    fn name(&self) -> &'static str;

    /// Authorization redirect target
    fn access_code_endpoint(&self) -> Endpoint;

    /// Token exchange target
    fn access_token_endpoint(&self) -> Endpoint;

    /// User-info target; may depend on data captured mid-flow
    fn user_info_endpoint(&self, extra: &HashMap<String, String>) -> Endpoint;

    /// Map the raw profile payload to a normalized [`UserInfo`].
    ///
    /// Missing optional fields (email, avatar) must not fail; a structurally
    /// unparseable payload may.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::AuthError::UserInfoParse`] on malformed payloads.
    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo>;

    /// Flow customization hooks, if any
    fn hooks(&self) -> Option<&FlowHooks> {
        None
    }
}

/// Contract for three-legged OAuth 1.0 providers
pub trait Oauth1Adapter: Send + Sync {
    /// Provider name, stamped onto every returned profile
    fn name(&self) -> &'static str;

    /// Request-token issuance target
    fn request_token_endpoint(&self) -> Endpoint;

    /// User authorization redirect target
    fn login_endpoint(&self) -> Endpoint;

    /// Verifier-to-access-token exchange target
    fn access_token_endpoint(&self) -> Endpoint;

    /// User-info target
    fn user_info_endpoint(&self, extra: &HashMap<String, String>) -> Endpoint;

    /// Map the raw profile payload to a normalized [`UserInfo`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::AuthError::UserInfoParse`] on malformed payloads.
    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo>;

    /// Flow customization hooks, if any
    fn hooks(&self) -> Option<&FlowHooks> {
        None
    }
}

/// Factory signature for OAuth 2.0 adapters
pub type Oauth2AdapterFactory = fn(&ClientConfiguration) -> Box<dyn Oauth2Adapter>;

/// Factory signature for OAuth 1.0 adapters
pub type Oauth1AdapterFactory = fn(&ClientConfiguration) -> Box<dyn Oauth1Adapter>;
