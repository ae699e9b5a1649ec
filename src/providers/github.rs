// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! GitHub OAuth 2.0 provider adapter.
//!
//! GitHub returns its token response urlencoded rather than as JSON, and its
//! API rejects query-parameter tokens, so the user-info call authenticates
//! with a bearer header through the `before_get_user_info` hook.

use super::{FlowHooks, Oauth2Adapter};
use crate::config::ClientConfiguration;
use crate::endpoints::Endpoint;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AvatarInfo, UserInfo};
use serde::Deserialize;
use std::collections::HashMap;

/// Provider identifier
pub const NAME: &str = "github";

/// GitHub OAuth 2.0 adapter
pub struct GithubAdapter {
    hooks: FlowHooks,
}

impl GithubAdapter {
    /// Factory for registry use
    #[must_use]
    pub fn create(_config: &ClientConfiguration) -> Box<dyn Oauth2Adapter> {
        let hooks = FlowHooks {
            before_get_user_info: Some(Box::new(|request, ctx| {
                if let Some(token) = ctx.access_token {
                    request.set_header("Authorization", format!("Bearer {token}"));
                }
                request.set_header("Accept", "application/vnd.github+json");
                request.set_header("User-Agent", "social-login");
            })),
            ..FlowHooks::default()
        };
        Box::new(Self { hooks })
    }
}

/// GitHub user response format
#[derive(Debug, Deserialize)]
struct GithubProfile {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

/// Append GitHub's `s` size parameter, respecting an existing query string
fn sized_avatar(url: &str, size: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}s={size}")
}

impl Oauth2Adapter for GithubAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn access_code_endpoint(&self) -> Endpoint {
        Endpoint::new("https://github.com", "/login/oauth/authorize")
    }

    fn access_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://github.com", "/login/oauth/access_token")
    }

    fn user_info_endpoint(&self, _extra: &HashMap<String, String>) -> Endpoint {
        Endpoint::new("https://api.github.com", "/user")
    }

    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo> {
        let profile: GithubProfile = serde_json::from_str(body)
            .map_err(|e| AuthError::UserInfoParse(anyhow::Error::new(e)))?;

        // Display name is a free-form single field; fall back to the login
        // when absent.
        let full_name = profile.name.unwrap_or_else(|| profile.login.clone());
        let (first_name, last_name) = match full_name.split_once(' ') {
            Some((first, last)) => (first.to_owned(), last.to_owned()),
            None => (full_name, String::new()),
        };

        Ok(UserInfo {
            id: profile.id.to_string(),
            provider_name: String::new(),
            email: profile.email,
            first_name,
            last_name,
            avatar: AvatarInfo {
                small: profile.avatar_url.as_ref().map(|a| sized_avatar(a, 48)),
                normal: profile.avatar_url.clone(),
                large: profile.avatar_url.as_ref().map(|a| sized_avatar(a, 256)),
            },
        })
    }

    fn hooks(&self) -> Option<&FlowHooks> {
        Some(&self.hooks)
    }
}
