// ABOUTME: Shared test helpers: fake transport and minimal provider adapters
// ABOUTME: Lets flow tests script provider responses and inspect issued requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(dead_code)]
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use social_login::config::ClientConfiguration;
use social_login::endpoints::Endpoint;
use social_login::errors::{AuthError, AuthResult};
use social_login::models::{AvatarInfo, UserInfo};
use social_login::providers::{FlowHooks, Oauth1Adapter, Oauth2Adapter};
use social_login::transport::{HttpRequest, HttpResponse, HttpTransport};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Transport fake: returns scripted responses and records every request
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_owned(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> AuthResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AuthError::Transport("no scripted response left".into()))
    }
}

pub fn test_config() -> ClientConfiguration {
    ClientConfiguration {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        client_public_key: None,
        scope: "profile email".into(),
        redirect_uri: "https://app.example.com/callback".into(),
        enabled: true,
        type_name: "test".into(),
    }
}

fn parse_test_profile(body: &str) -> AuthResult<UserInfo> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AuthError::UserInfoParse(anyhow::Error::new(e)))?;
    let field = |key: &str| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    };
    Ok(UserInfo {
        id: field("id").unwrap_or_default(),
        provider_name: String::new(),
        email: field("email"),
        first_name: field("first_name").unwrap_or_default(),
        last_name: field("last_name").unwrap_or_default(),
        avatar: AvatarInfo {
            small: None,
            normal: field("avatar"),
            large: None,
        },
    })
}

/// OAuth 2.0 adapter without hooks: token rides as a query parameter
pub struct PlainOauth2Adapter;

impl Oauth2Adapter for PlainOauth2Adapter {
    fn name(&self) -> &'static str {
        "test-oauth2"
    }

    fn access_code_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/authorize")
    }

    fn access_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/token")
    }

    fn user_info_endpoint(&self, _extra: &HashMap<String, String>) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/api/me")
    }

    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo> {
        parse_test_profile(body)
    }
}

/// OAuth 2.0 adapter whose hook switches user-info auth to a bearer header
pub struct BearerOauth2Adapter {
    hooks: FlowHooks,
}

impl BearerOauth2Adapter {
    pub fn new() -> Self {
        let hooks = FlowHooks {
            before_get_user_info: Some(Box::new(|request, ctx| {
                if let Some(token) = ctx.access_token {
                    request.set_header("Authorization", format!("Bearer {token}"));
                }
            })),
            ..FlowHooks::default()
        };
        Self { hooks }
    }
}

impl Oauth2Adapter for BearerOauth2Adapter {
    fn name(&self) -> &'static str {
        "test-bearer"
    }

    fn access_code_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/authorize")
    }

    fn access_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/token")
    }

    fn user_info_endpoint(&self, _extra: &HashMap<String, String>) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/api/me")
    }

    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo> {
        parse_test_profile(body)
    }

    fn hooks(&self) -> Option<&FlowHooks> {
        Some(&self.hooks)
    }
}

/// OAuth 1.0 adapter with a hook adding a query parameter before signing
pub struct TestOauth1Adapter {
    hooks: FlowHooks,
}

impl TestOauth1Adapter {
    pub fn new() -> Self {
        let hooks = FlowHooks {
            before_get_user_info: Some(Box::new(|request, _ctx| {
                let _ = request.append_query_param("detail", "full");
            })),
            ..FlowHooks::default()
        };
        Self { hooks }
    }
}

impl Oauth1Adapter for TestOauth1Adapter {
    fn name(&self) -> &'static str {
        "test-oauth1"
    }

    fn request_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/request_token")
    }

    fn login_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/authenticate")
    }

    fn access_token_endpoint(&self) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/oauth/access_token")
    }

    fn user_info_endpoint(&self, _extra: &HashMap<String, String>) -> Endpoint {
        Endpoint::new("https://provider.example.com", "/api/me.json")
    }

    fn parse_user_info(&self, body: &str) -> AuthResult<UserInfo> {
        parse_test_profile(body)
    }

    fn hooks(&self) -> Option<&FlowHooks> {
        Some(&self.hooks)
    }
}
