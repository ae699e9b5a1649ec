// ABOUTME: OAuth 2.0 authorization-code and refresh-token flow engine
// ABOUTME: Owns per-attempt token state and drives the code-for-token exchange
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # OAuth 2.0 Flow Engine
//!
//! Drives the authorization-code grant: build the login URI, exchange the
//! callback code for an access token, fetch and normalize the user profile.
//! Also owns refresh-token exchanges through [`Oauth2Flow::current_token`].
//!
//! The engine is generic over the provider: endpoints, profile parsing and
//! request quirks come from the injected [`Oauth2Adapter`]. Token state lives
//! in an [`Oauth2Session`] the caller can inspect but only the engine writes.

use crate::config::ClientConfiguration;
use crate::errors::{AuthError, AuthResult};
use crate::flows::{verify_response, CallbackParams};
use crate::models::UserInfo;
use crate::parsing::{extract_field, extract_non_empty_field};
use crate::providers::{HookContext, Oauth2Adapter};
use crate::transport::{HttpRequest, HttpTransport};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Where an OAuth 2.0 attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    /// Nothing has happened yet
    Idle,
    /// A login URI was built for the caller
    LoginLinkIssued,
    /// The authorization code is being exchanged
    Exchanging,
    /// A refresh-token exchange is in flight
    Refreshing,
    /// An access token is held
    Authenticated,
    /// The attempt failed; terminal
    Failed,
}

/// Mutable protocol state owned by one engine instance.
///
/// Tokens are written only after a verified, complete response, so a
/// cancelled operation never commits partial state.
#[derive(Debug)]
pub struct Oauth2Session {
    /// Current flow stage, inspectable by tests and callers
    pub stage: FlowStage,
    /// CSRF state echoed by the provider in the callback
    pub state: Option<String>,
    /// Access token after a successful exchange
    pub access_token: Option<String>,
    /// Refresh token, kept across refresh grants that omit a new one
    pub refresh_token: Option<String>,
    /// Token type reported by the provider (usually "Bearer")
    pub token_type: Option<String>,
    /// Absolute expiry; `None` means unknown or no stored token
    pub expires_at: Option<DateTime<Utc>>,
    /// Side-channel data captured by adapter hooks mid-flow
    pub extra: HashMap<String, String>,
}

impl Oauth2Session {
    fn new() -> Self {
        Self {
            stage: FlowStage::Idle,
            state: None,
            access_token: None,
            refresh_token: None,
            token_type: None,
            expires_at: None,
            extra: HashMap::new(),
        }
    }
}

/// Token grant being exchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// OAuth 2.0 authorization-code flow engine.
///
/// One instance serves exactly one authentication attempt; create a fresh one
/// per login and drop it once [`UserInfo`] is obtained or the attempt fails.
pub struct Oauth2Flow {
    config: ClientConfiguration,
    adapter: Box<dyn Oauth2Adapter>,
    transport: Arc<dyn HttpTransport>,
    session: Oauth2Session,
}

impl Oauth2Flow {
    /// Create an engine for one login attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when the configuration fails the
    /// enabled-client invariant.
    pub fn new(
        adapter: Box<dyn Oauth2Adapter>,
        config: ClientConfiguration,
        transport: Arc<dyn HttpTransport>,
    ) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            adapter,
            transport,
            session: Oauth2Session::new(),
        })
    }

    /// Provider name from the adapter
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.adapter.name()
    }

    /// CSRF state echoed by the provider, once the callback was processed
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.session.state.as_deref()
    }

    /// Inspect the session state
    #[must_use]
    pub fn session(&self) -> &Oauth2Session {
        &self.session
    }

    /// Build the authorization-request URI the user should be redirected to.
    ///
    /// Pure URI construction; the provider is not contacted. `scope` and
    /// `state` are omitted when empty.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when the adapter's authorization endpoint
    /// is not a valid URL.
    pub fn login_link_uri(&mut self, state: Option<&str>) -> AuthResult<String> {
        let endpoint = self.adapter.access_code_endpoint();
        let mut url = url::Url::parse(&endpoint.uri())
            .map_err(|e| AuthError::Config(format!("invalid authorization endpoint: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri);
            if !self.config.scope.is_empty() {
                query.append_pair("scope", &self.config.scope);
            }
            if let Some(state) = state.filter(|s| !s.is_empty()) {
                query.append_pair("state", state);
            }
        }

        self.session.stage = FlowStage::LoginLinkIssued;
        debug!(provider = self.adapter.name(), "issued login link");
        Ok(url.to_string())
    }

    /// Complete the login: exchange the callback code for a token, then fetch
    /// and normalize the user profile.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Protocol`] when the callback carries an `error` value;
    ///   raised before any network call.
    /// - [`AuthError::MissingField`] when the callback lacks `code` or the
    ///   token response lacks `access_token`.
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
        if let Some(error) = params.first_non_empty("error") {
            return Err(AuthError::Protocol(error.to_owned()));
        }
        self.session.state = params.first("state").map(str::to_owned);

        let code = params
            .first_non_empty("code")
            .ok_or(AuthError::MissingField("code"))?
            .to_owned();

        self.query_access_token(&code, GrantType::AuthorizationCode)
            .await?;
        self.query_user_info().await
    }

    /// Return the cached access token, refreshing it when expired or forced.
    ///
    /// Two unforced calls before expiry return the identical token without a
    /// second network call; `force_update` always performs exactly one
    /// refresh exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when no refresh token is available and no
    /// usable cached token exists; otherwise the exchange errors of
    /// [`Self::get_user_info`].
    pub async fn current_token(
        &mut self,
        refresh_token: Option<&str>,
        force_update: bool,
    ) -> AuthResult<String> {
        let cached_valid = self.session.access_token.is_some()
            && self.session.expires_at.is_some_and(|at| Utc::now() < at);
        if !force_update && cached_valid {
            if let Some(token) = self.session.access_token.clone() {
                return Ok(token);
            }
        }

        let refresh = refresh_token
            .map(str::to_owned)
            .or_else(|| self.session.refresh_token.clone())
            .ok_or_else(|| {
                AuthError::Config("no refresh token available and no cached access token".into())
            })?;

        self.session.stage = FlowStage::Refreshing;
        info!(provider = self.adapter.name(), "refreshing access token");
        let result = self.query_access_token(&refresh, GrantType::RefreshToken).await;
        if result.is_err() {
            self.session.stage = FlowStage::Failed;
        }
        result?;

        self.session
            .access_token
            .clone()
            .ok_or(AuthError::MissingField("access_token"))
    }

    /// Exchange a code or refresh token at the access-token endpoint and
    /// commit the parsed token state.
    async fn query_access_token(&mut self, value: &str, grant: GrantType) -> AuthResult<()> {
        if grant == GrantType::AuthorizationCode {
            self.session.stage = FlowStage::Exchanging;
        }

        let mut request = HttpRequest::post(&self.adapter.access_token_endpoint());
        request.add_form_param("client_id", &self.config.client_id);
        request.add_form_param("client_secret", &self.config.client_secret);
        request.add_form_param("redirect_uri", &self.config.redirect_uri);
        request.add_form_param("grant_type", grant.as_str());
        match grant {
            GrantType::AuthorizationCode => request.add_form_param("code", value),
            GrantType::RefreshToken => request.add_form_param("refresh_token", value),
        }

        if let Some(hook) = self
            .adapter
            .hooks()
            .and_then(|h| h.before_get_access_token.as_ref())
        {
            let ctx = HookContext {
                config: &self.config,
                access_token: self.session.access_token.as_deref(),
                extra: &self.session.extra,
            };
            hook(&mut request, &ctx);
        }

        let response = self.transport.execute(request).await?;
        verify_response(&response)?;

        if let Some(hook) = self
            .adapter
            .hooks()
            .and_then(|h| h.after_get_access_token.as_ref())
        {
            hook(&response, &mut self.session.extra);
        }

        let access_token = extract_non_empty_field(&response.body, "access_token")
            .ok_or(AuthError::MissingField("access_token"))?;

        // Providers frequently omit the refresh token on refresh grants;
        // keep the stored one in that case.
        match extract_non_empty_field(&response.body, "refresh_token") {
            Some(refresh) => self.session.refresh_token = Some(refresh),
            None if grant == GrantType::AuthorizationCode => self.session.refresh_token = None,
            None => {}
        }

        self.session.token_type = extract_field(&response.body, "token_type");
        if let Some(seconds) = extract_field(&response.body, "expires_in")
            .and_then(|raw| raw.parse::<i64>().ok())
        {
            // An out-of-range lifetime is recorded as an unknown expiry.
            self.session.expires_at = Duration::try_seconds(seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        }

        self.session.access_token = Some(access_token);
        self.session.stage = FlowStage::Authenticated;
        debug!(
            provider = self.adapter.name(),
            grant = grant.as_str(),
            "token exchange completed"
        );
        Ok(())
    }

    /// Fetch the raw profile and hand it to the adapter for normalization.
    async fn query_user_info(&mut self) -> AuthResult<UserInfo> {
        let token = self
            .session
            .access_token
            .clone()
            .ok_or(AuthError::MissingField("access_token"))?;

        let endpoint = self.adapter.user_info_endpoint(&self.session.extra);
        let mut request = HttpRequest::get(&endpoint);

        // The token rides as a query parameter unless the adapter replaces
        // the authentication mechanism (bearer header, signed request, ...).
        match self
            .adapter
            .hooks()
            .and_then(|h| h.before_get_user_info.as_ref())
        {
            Some(hook) => {
                let ctx = HookContext {
                    config: &self.config,
                    access_token: Some(&token),
                    extra: &self.session.extra,
                };
                hook(&mut request, &ctx);
            }
            None => request.append_query_param("access_token", &token)?,
        }

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
