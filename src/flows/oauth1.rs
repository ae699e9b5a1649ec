// ABOUTME: Three-legged OAuth 1.0 request-token/access-token flow engine
// ABOUTME: Owns the request and access token pairs across the verifier exchange
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # OAuth 1.0 Flow Engine
//!
//! Drives the three-legged grant: obtain a request token, send the user to the
//! provider's login page, exchange the returned verifier for the final access
//! token, then fetch the profile with a signed protected-resource call.
//!
//! The request-token pair and the final access-token pair live in two
//! explicitly named session slots. The request pair exists only between
//! [`Oauth1Flow::login_link_uri`] and the verifier exchange, which writes the
//! access slot and clears it.

pub mod signature;

use crate::config::ClientConfiguration;
use crate::errors::{AuthError, AuthResult};
use crate::flows::{verify_response, CallbackParams};
use crate::models::{TokenPair, UserInfo};
use crate::parsing::extract_non_empty_field;
use crate::providers::{HookContext, Oauth1Adapter};
use crate::transport::{HttpRequest, HttpTransport};
use signature::{sign_request, SigningContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a three-legged attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    /// Nothing has happened yet
    Idle,
    /// The request token was issued by the provider
    RequestTokenObtained,
    /// A login URI was built for the caller
    LoginLinkIssued,
    /// The verifier is being exchanged for the access token
    Exchanging,
    /// The final access token is held
    Authenticated,
    /// The attempt failed; terminal
    Failed,
}

/// Mutable protocol state owned by one engine instance
#[derive(Debug)]
pub struct Oauth1Session {
    /// Current flow stage, inspectable by tests and callers
    pub stage: FlowStage,
    /// Request-token pair, held only until the verifier exchange
    pub request_token: Option<TokenPair>,
    /// Final access-token pair, written by the verifier exchange
    pub access_token: Option<TokenPair>,
    /// Side-channel data captured by adapter hooks
    pub extra: HashMap<String, String>,
}

impl Oauth1Session {
    fn new() -> Self {
        Self {
            stage: FlowStage::Idle,
            request_token: None,
            access_token: None,
            extra: HashMap::new(),
        }
    }
}

/// Three-legged OAuth 1.0 flow engine.
///
/// One instance serves exactly one authentication attempt, and the two
/// operations must run in order: the verifier exchange needs the request-token
/// secret obtained by [`Self::login_link_uri`].
pub struct Oauth1Flow {
    config: ClientConfiguration,
    adapter: Box<dyn Oauth1Adapter>,
    transport: Arc<dyn HttpTransport>,
    session: Oauth1Session,
}

impl Oauth1Flow {
    /// Create an engine for one login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when the configuration fails the
    /// enabled-client invariant.
    pub fn new(
        adapter: Box<dyn Oauth1Adapter>,
        config: ClientConfiguration,
        transport: Arc<dyn HttpTransport>,
    ) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            adapter,
            transport,
            session: Oauth1Session::new(),
        })
    }

    /// Provider name from the adapter
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.adapter.name()
    }

    /// CSRF state: always unavailable, this protocol variant has no standard
    /// channel for it
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        None
    }

    /// Inspect the session state
    #[must_use]
    pub fn session(&self) -> &Oauth1Session {
        &self.session
    }

    /// Obtain a request token and build the login URI the user should be
    /// redirected to.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotSupported`] when a non-empty CSRF `state` is
    ///   requested; raised before any network call.
    /// - [`AuthError::MissingField`] when the request-token response lacks
    ///   `oauth_token` or `oauth_token_secret`.
    /// - [`AuthError::UnexpectedResponse`] on empty or non-success responses.
    pub async fn login_link_uri(&mut self, state: Option<&str>) -> AuthResult<String> {
        if state.is_some_and(|s| !s.is_empty()) {
            return Err(AuthError::NotSupported("CSRF state"));
        }
        let result = self.try_login_link_uri().await;
        if result.is_err() {
            self.session.stage = FlowStage::Failed;
        }
        result
    }

    async fn try_login_link_uri(&mut self) -> AuthResult<String> {
        let mut request = HttpRequest::post(&self.adapter.request_token_endpoint());
        sign_request(
            &mut request,
            &SigningContext {
                consumer_key: &self.config.client_id,
                consumer_secret: &self.config.client_secret,
                callback: Some(&self.config.redirect_uri),
                ..SigningContext::default()
            },
        );

        let response = self.transport.execute(request).await?;
        verify_response(&response)?;

        let pair = parse_token_pair(&response.body)?;
        debug!(provider = self.adapter.name(), "request token obtained");
        self.session.request_token = Some(pair.clone());
        self.session.stage = FlowStage::RequestTokenObtained;

        let endpoint = self.adapter.login_endpoint();
        let mut url = url::Url::parse(&endpoint.uri())
            .map_err(|e| AuthError::Config(format!("invalid login endpoint: {e}")))?;
        url.query_pairs_mut().append_pair("oauth_token", &pair.token);

        self.session.stage = FlowStage::LoginLinkIssued;
        Ok(url.to_string())
    }

    /// Complete the login: exchange the verifier for the access token, then
    /// fetch and normalize the user profile with a signed call.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingField`] when the callback lacks `oauth_token` or
    ///   `oauth_verifier`, or the access-token response lacks the token pair.
    /// - [`AuthError::Config`] when called before [`Self::login_link_uri`].
    /// - [`AuthError::UnexpectedResponse`] on empty or non-success responses.
    /// - [`AuthError::UserInfoParse`] when the adapter rejects the payload.
    pub async fn get_user_info(&mut self, params: &CallbackParams) -> AuthResult<UserInfo> {
        let result = self.try_get_user_info(params).await;
        if result.is_err() {
            self.session.stage = FlowStage::Failed;
        }
        result
    }

    async fn try_get_user_info(&mut self, params: &CallbackParams) -> AuthResult<UserInfo> {
        let token = params
            .first_non_empty("oauth_token")
            .ok_or(AuthError::MissingField("oauth_token"))?
            .to_owned();
        let verifier = params
            .first_non_empty("oauth_verifier")
            .ok_or(AuthError::MissingField("oauth_verifier"))?
            .to_owned();

        let request_secret = self
            .session
            .request_token
            .as_ref()
            .map(|pair| pair.secret.clone())
            .ok_or_else(|| {
                AuthError::Config("no request token held; call login_link_uri first".into())
            })?;

        self.session.stage = FlowStage::Exchanging;
        let mut request = HttpRequest::post(&self.adapter.access_token_endpoint());
        sign_request(
            &mut request,
            &SigningContext {
                consumer_key: &self.config.client_id,
                consumer_secret: &self.config.client_secret,
                token: Some(&token),
                token_secret: Some(&request_secret),
                verifier: Some(&verifier),
                ..SigningContext::default()
            },
        );

        let response = self.transport.execute(request).await?;
        verify_response(&response)?;

        // Role change: the access pair replaces the request pair, which has
        // served its purpose.
        let access_pair = parse_token_pair(&response.body)?;
        self.session.request_token = None;
        self.session.access_token = Some(access_pair);
        self.session.stage = FlowStage::Authenticated;
        debug!(provider = self.adapter.name(), "access token obtained");

        self.query_user_info().await
    }

    /// Signed protected-resource call for the raw profile
    async fn query_user_info(&mut self) -> AuthResult<UserInfo> {
        let pair = self
            .session
            .access_token
            .clone()
            .ok_or(AuthError::MissingField("oauth_token"))?;

        let endpoint = self.adapter.user_info_endpoint(&self.session.extra);
        let mut request = HttpRequest::get(&endpoint);

        // Hook-added parameters must land before signing so they are covered
        // by the signature.
        if let Some(hook) = self
            .adapter
            .hooks()
            .and_then(|h| h.before_get_user_info.as_ref())
        {
            let ctx = HookContext {
                config: &self.config,
                access_token: Some(&pair.token),
                extra: &self.session.extra,
            };
            hook(&mut request, &ctx);
        }

        sign_request(
            &mut request,
            &SigningContext {
                consumer_key: &self.config.client_id,
                consumer_secret: &self.config.client_secret,
                token: Some(&pair.token),
                token_secret: Some(&pair.secret),
                ..SigningContext::default()
            },
        );

        let response = self.transport.execute(request).await?;
        verify_response(&response)?;

        let mut info = self.adapter.parse_user_info(&response.body)?;
        info.provider_name = self.adapter.name().to_owned();
        info!(
            provider = self.adapter.name(),
            user_id = %info.id,
            "login completed"
        );
        Ok(info)
    }
}

/// Parse `oauth_token` and `oauth_token_secret` from a token response body
fn parse_token_pair(body: &str) -> AuthResult<TokenPair> {
    let token =
        extract_non_empty_field(body, "oauth_token").ok_or(AuthError::MissingField("oauth_token"))?;
    let secret = extract_non_empty_field(body, "oauth_token_secret")
        .ok_or(AuthError::MissingField("oauth_token_secret"))?;
    Ok(TokenPair { token, secret })
}
