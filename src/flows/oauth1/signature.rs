// ABOUTME: RFC 5849 HMAC-SHA1 request signing for the three-legged OAuth flow
// ABOUTME: Builds the normalized base string and the Authorization OAuth header
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! OAuth 1.0 request signing.
//!
//! Each leg of the flow signs differently only in which credentials enter the
//! [`SigningContext`]: the request-token leg carries the callback, the
//! access-token leg carries the request token plus verifier, and protected
//! resource calls carry the final token alone. The signature itself is always
//! HMAC-SHA1 over the normalized base string, emitted as an
//! `Authorization: OAuth` header.

use crate::transport::{HttpMethod, HttpRequest};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::distributions::Alphanumeric;
use rand::Rng;
use ring::hmac;

/// Credentials entering one signed request
#[derive(Debug, Clone, Copy, Default)]
pub struct SigningContext<'a> {
    /// Consumer key (client id)
    pub consumer_key: &'a str,
    /// Consumer secret (client secret)
    pub consumer_secret: &'a str,
    /// Current token (request token or access token, depending on the leg)
    pub token: Option<&'a str>,
    /// Secret paired with `token`
    pub token_secret: Option<&'a str>,
    /// `oauth_callback`, request-token leg only
    pub callback: Option<&'a str>,
    /// `oauth_verifier`, access-token leg only
    pub verifier: Option<&'a str>,
}

/// Percent-encode with the RFC 3986 unreserved set, as RFC 5849 requires
#[must_use]
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Random alphanumeric nonce
#[must_use]
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Current Unix timestamp as a string
#[must_use]
pub fn current_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Sign a request and attach the `Authorization: OAuth` header.
///
/// Signs over the request's existing query and form parameters plus the
/// generated `oauth_*` protocol parameters, so any hook-added parameters must
/// be in place before signing.
pub fn sign_request(request: &mut HttpRequest, ctx: &SigningContext<'_>) {
    sign_request_at(request, ctx, &current_timestamp(), &generate_nonce());
}

/// Deterministic variant of [`sign_request`] with injected timestamp and nonce
pub fn sign_request_at(
    request: &mut HttpRequest,
    ctx: &SigningContext<'_>,
    timestamp: &str,
    nonce: &str,
) {
    let oauth_params = oauth_params(ctx, timestamp, nonce);

    let (base_url, query_params) = split_url(&request.url);
    let mut all_params: Vec<(String, String)> = oauth_params.clone();
    all_params.extend(query_params);
    all_params.extend(request.form.iter().cloned());

    let method = match request.method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    };
    let base = signature_base_string(method, &base_url, &all_params);
    let signature = hmac_sha1_signature(
        &base,
        ctx.consumer_secret,
        ctx.token_secret.unwrap_or_default(),
    );

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".to_owned(), signature));
    let header = header_params
        .iter()
        .map(|(k, v)| format!("{k}=\"{}\"", percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    request.set_header("Authorization", format!("OAuth {header}"));
}

/// Protocol parameters for one signed request, before the signature itself
fn oauth_params(ctx: &SigningContext<'_>, timestamp: &str, nonce: &str) -> Vec<(String, String)> {
    let mut params = vec![
        ("oauth_consumer_key".to_owned(), ctx.consumer_key.to_owned()),
        ("oauth_nonce".to_owned(), nonce.to_owned()),
        ("oauth_signature_method".to_owned(), "HMAC-SHA1".to_owned()),
        ("oauth_timestamp".to_owned(), timestamp.to_owned()),
        ("oauth_version".to_owned(), "1.0".to_owned()),
    ];
    if let Some(callback) = ctx.callback {
        params.push(("oauth_callback".to_owned(), callback.to_owned()));
    }
    if let Some(token) = ctx.token {
        params.push(("oauth_token".to_owned(), token.to_owned()));
    }
    if let Some(verifier) = ctx.verifier {
        params.push(("oauth_verifier".to_owned(), verifier.to_owned()));
    }
    params
}

/// `METHOD&enc(url)&enc(normalized-params)` per RFC 5849 §3.4.1
#[must_use]
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&normalized)
    )
}

/// Base64 HMAC-SHA1 over the base string with `enc(consumer)&enc(token)` key
#[must_use]
pub fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key_material = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key_material.as_bytes());
    let tag = hmac::sign(&key, base.as_bytes());
    STANDARD.encode(tag.as_ref())
}

/// Split a URL into its query-less form and its decoded query pairs
fn split_url(raw: &str) -> (String, Vec<(String, String)>) {
    url::Url::parse(raw).map_or_else(
        |_| (raw.to_owned(), Vec::new()),
        |mut url| {
            let pairs: Vec<(String, String)> = url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            url.set_query(None);
            (url.to_string(), pairs)
        },
    )
}
