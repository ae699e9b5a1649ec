// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Google OAuth 2.0 provider adapter

use super::Oauth2Adapter;
use crate::config::ClientConfiguration;
use crate::endpoints::Endpoint;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AvatarInfo, UserInfo};
use serde::Deserialize;
use std::collections::HashMap;

/// Provider identifier
pub const NAME: &str = "google";

/// Google OAuth 2.0 adapter
pub struct GoogleAdapter;

impl GoogleAdapter {
    /// Factory for registry use
    #[must_use]
    pub fn create(_config: &ClientConfiguration) -> Box<dyn Oauth2Adapter> {
        Box::new(Self)
    }
}

/// Google userinfo response format
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl Oauth2Adapter for GoogleAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn access_code_endpoint(&self) -> Endpoint {
        Endpoint::new("https://accounts.google.com", "/o/oauth2/auth")
    }

    fn access_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://accounts.google.com", "/o/oauth2/token")
    }

    fn user_info_endpoint(&self, _extra: &HashMap<String, String>) -> Endpoint {
        Endpoint::new("https://www.googleapis.com", "/oauth2/v1/userinfo")
    }

    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo> {
        let profile: GoogleProfile = serde_json::from_str(body)
            .map_err(|e| AuthError::UserInfoParse(anyhow::Error::new(e)))?;

        // The picture URL accepts a size override through the sz parameter.
        let avatar = AvatarInfo {
            small: profile.picture.as_ref().map(|p| format!("{p}?sz=48")),
            normal: profile.picture.clone(),
            large: profile.picture.as_ref().map(|p| format!("{p}?sz=256")),
        };

        Ok(UserInfo {
            id: profile.id,
            provider_name: String::new(),
            email: profile.email,
            first_name: profile.given_name.unwrap_or_default(),
            last_name: profile.family_name.unwrap_or_default(),
            avatar,
        })
    }
}
