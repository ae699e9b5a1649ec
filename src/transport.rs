// ABOUTME: HTTP transport seam with OAuth-tuned client factories
// ABOUTME: Gives flow engines a small request/response surface that tests can fake
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # HTTP Transport
//!
//! The engines never touch `reqwest` types directly. They build an
//! [`HttpRequest`], hand it to an [`HttpTransport`], and inspect the returned
//! status and body. Production code uses [`ReqwestTransport`] built from the
//! factory functions here; tests inject a fake transport through the same
//! trait. Dropping the future returned by `execute` aborts the in-flight call,
//! which is how flow cancellation propagates.

use crate::endpoints::Endpoint;
use crate::errors::{AuthError, AuthResult};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Proxy};
use std::time::Duration;

/// HTTP method for a flow request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request (user-info retrieval)
    Get,
    /// POST request (token exchanges)
    Post,
}

/// A protocol request built by a flow engine.
///
/// Hooks may rewrite any part of this before execution: replace the form
/// body, add headers, or change the authentication mechanism entirely.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method
    pub method: HttpMethod,
    /// Absolute request URL
    pub url: String,
    /// Headers to send, in insertion order
    pub headers: Vec<(String, String)>,
    /// Form parameters; sent urlencoded in the body for POST requests
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    /// Build a GET request against an endpoint
    #[must_use]
    pub fn get(endpoint: &Endpoint) -> Self {
        Self {
            method: HttpMethod::Get,
            url: endpoint.uri(),
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    /// Build a POST request against an endpoint
    #[must_use]
    pub fn post(endpoint: &Endpoint) -> Self {
        Self {
            method: HttpMethod::Post,
            url: endpoint.uri(),
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    /// Add a header
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Add a form parameter
    pub fn add_form_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.form.push((name.into(), value.into()));
    }

    /// Append a query parameter to the request URL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when the URL is not parseable, which can
    /// only come from a misconfigured adapter endpoint.
    pub fn append_query_param(&mut self, name: &str, value: &str) -> AuthResult<()> {
        let mut url = url::Url::parse(&self.url)
            .map_err(|e| AuthError::Config(format!("invalid request URL {}: {e}", self.url)))?;
        url.query_pairs_mut().append_pair(name, value);
        self.url = url.to_string();
        Ok(())
    }

    /// Look up a header value by case-insensitive name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A provider response as seen by the flow engines
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport capability consumed by the flow engines
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a request and return the raw response.
    ///
    /// Non-success statuses are returned, not errored; the engines own that
    /// verification step.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] when no response was obtained at all.
    async fn execute(&self, request: HttpRequest) -> AuthResult<HttpResponse>;
}

/// Production transport backed by a pooled `reqwest` client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wrap an existing client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Transport with OAuth-tuned timeouts
    #[must_use]
    pub fn oauth() -> Self {
        Self::new(oauth_client())
    }

    /// Transport with OAuth-tuned timeouts routed through a proxy.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when the proxy URL is invalid.
    pub fn oauth_with_proxy(proxy_url: &str) -> AuthResult<Self> {
        let proxy = Proxy::all(proxy_url)
            .map_err(|e| AuthError::Config(format!("invalid proxy URL {proxy_url}: {e}")))?;
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .proxy(proxy)
            .build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> AuthResult<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if request.method == HttpMethod::Post {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Create an HTTP client with custom timeout settings
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client tuned for OAuth exchanges, which should be fast operations
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(15, 5)
}
