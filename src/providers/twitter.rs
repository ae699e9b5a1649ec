// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Twitter OAuth 1.0 provider adapter.
//!
//! The `before_get_user_info` hook asks `verify_credentials` for the email
//! address; the parameter is added before signing so the signature covers it.

use super::{FlowHooks, Oauth1Adapter};
use crate::config::ClientConfiguration;
use crate::endpoints::Endpoint;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AvatarInfo, UserInfo};
use serde::Deserialize;
use std::collections::HashMap;

/// Provider identifier
pub const NAME: &str = "twitter";

/// Twitter OAuth 1.0 adapter
pub struct TwitterAdapter {
    hooks: FlowHooks,
}

impl TwitterAdapter {
    /// Factory for registry use
    #[must_use]
    pub fn create(_config: &ClientConfiguration) -> Box<dyn Oauth1Adapter> {
        let hooks = FlowHooks {
            before_get_user_info: Some(Box::new(|request, _ctx| {
                let _ = request.append_query_param("include_email", "true");
            })),
            ..FlowHooks::default()
        };
        Box::new(Self { hooks })
    }
}

/// `verify_credentials` response format
#[derive(Debug, Deserialize)]
struct TwitterProfile {
    id_str: String,
    name: String,
    email: Option<String>,
    profile_image_url_https: Option<String>,
}

impl Oauth1Adapter for TwitterAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn request_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://api.twitter.com", "/oauth/request_token")
    }

    fn login_endpoint(&self) -> Endpoint {
        Endpoint::new("https://api.twitter.com", "/oauth/authenticate")
    }

    fn access_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://api.twitter.com", "/oauth/access_token")
    }

    fn user_info_endpoint(&self, _extra: &HashMap<String, String>) -> Endpoint {
        Endpoint::new("https://api.twitter.com", "/1.1/account/verify_credentials.json")
    }

    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo> {
        let profile: TwitterProfile = serde_json::from_str(body)
            .map_err(|e| AuthError::UserInfoParse(anyhow::Error::new(e)))?;

        let (first_name, last_name) = match profile.name.split_once(' ') {
            Some((first, last)) => (first.to_owned(), last.to_owned()),
            None => (profile.name.clone(), String::new()),
        };

        // Size variants hang off the _normal suffix of the base image URL.
        let image = profile.profile_image_url_https;
        let avatar = AvatarInfo {
            small: image.as_ref().map(|i| i.replace("_normal", "_mini")),
            normal: image.clone(),
            large: image.as_ref().map(|i| i.replace("_normal", "")),
        };

        Ok(UserInfo {
            id: profile.id_str,
            provider_name: String::new(),
            email: profile.email,
            first_name,
            last_name,
            avatar,
        })
    }

    fn hooks(&self) -> Option<&FlowHooks> {
        Some(&self.hooks)
    }
}
