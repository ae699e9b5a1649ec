// ABOUTME: Normalized output records shared by all provider adapters
// ABOUTME: Defines the UserInfo profile, avatar sizes, and OAuth1 token pair
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Shared Data Models
//!
//! Every adapter maps its provider-specific payload into [`UserInfo`], so the
//! hosting application sees one profile shape regardless of which provider the
//! user authenticated against. `UserInfo` is output-only: engines never build
//! one directly, they stamp `provider_name` onto whatever the adapter parsed.

use serde::{Deserialize, Serialize};

/// Avatar URIs at the three sizes providers commonly expose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarInfo {
    /// Small thumbnail URI
    pub small: Option<String>,
    /// Regular-size avatar URI
    pub normal: Option<String>,
    /// Large avatar URI
    pub large: Option<String>,
}

/// Normalized user profile returned by a completed login flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Provider-scoped user identifier
    pub id: String,
    /// Name of the provider that authenticated the user; stamped by the
    /// flow engine, not the adapter
    pub provider_name: String,
    /// Email address, when the provider discloses one
    pub email: Option<String>,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar URIs at available sizes
    pub avatar: AvatarInfo,
}

impl UserInfo {
    /// Primary photo URI: a view of the normal-size avatar
    #[must_use]
    pub fn photo_uri(&self) -> Option<&str> {
        self.avatar.normal.as_deref()
    }
}

/// An OAuth 1.0 token/secret pair.
///
/// The same shape serves both roles in the three-legged flow: first as the
/// request token obtained before user authorization, then as the final access
/// token after the verifier exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// `oauth_token` value
    pub token: String,
    /// `oauth_token_secret` value
    pub secret: String,
}
