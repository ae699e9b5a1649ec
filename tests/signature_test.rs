// ABOUTME: Known-answer and property tests for OAuth 1.0 HMAC-SHA1 signing
// ABOUTME: Verifies base-string normalization against the documented Twitter example
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use social_login::endpoints::Endpoint;
use social_login::flows::oauth1::signature::{
    hmac_sha1_signature, percent_encode, sign_request_at, signature_base_string, SigningContext,
};
use social_login::transport::HttpRequest;

// Worked example from the Twitter API signing documentation.
const CONSUMER_KEY: &str = "xvz1evFS4wEEPTGEFPHBog";
const CONSUMER_SECRET: &str = "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw";
const TOKEN: &str = "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb";
const TOKEN_SECRET: &str = "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE";
const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
const TIMESTAMP: &str = "1318622958";
const STATUS: &str = "Hello Ladies + Gentlemen, a signed OAuth request!";

const EXPECTED_BASE: &str = "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521";

const EXPECTED_SIGNATURE: &str = "tnnArxj06cWHq44gCs1OSKk/jLY=";

fn documented_params() -> Vec<(String, String)> {
    vec![
        ("status".to_owned(), STATUS.to_owned()),
        ("include_entities".to_owned(), "true".to_owned()),
        ("oauth_consumer_key".to_owned(), CONSUMER_KEY.to_owned()),
        ("oauth_nonce".to_owned(), NONCE.to_owned()),
        ("oauth_signature_method".to_owned(), "HMAC-SHA1".to_owned()),
        ("oauth_timestamp".to_owned(), TIMESTAMP.to_owned()),
        ("oauth_token".to_owned(), TOKEN.to_owned()),
        ("oauth_version".to_owned(), "1.0".to_owned()),
    ]
}

#[test]
fn base_string_matches_documented_example() {
    let base = signature_base_string(
        "POST",
        "https://api.twitter.com/1.1/statuses/update.json",
        &documented_params(),
    );
    assert_eq!(base, EXPECTED_BASE);
}

#[test]
fn hmac_signature_matches_documented_example() {
    let signature = hmac_sha1_signature(EXPECTED_BASE, CONSUMER_SECRET, TOKEN_SECRET);
    assert_eq!(signature, EXPECTED_SIGNATURE);
}

#[test]
fn signed_request_header_carries_the_documented_signature() {
    let endpoint = Endpoint::new(
        "https://api.twitter.com",
        "/1.1/statuses/update.json?include_entities=true",
    );
    let mut request = HttpRequest::post(&endpoint);
    request.add_form_param("status", STATUS);

    let ctx = SigningContext {
        consumer_key: CONSUMER_KEY,
        consumer_secret: CONSUMER_SECRET,
        token: Some(TOKEN),
        token_secret: Some(TOKEN_SECRET),
        ..SigningContext::default()
    };
    sign_request_at(&mut request, &ctx, TIMESTAMP, NONCE);

    let auth = request.header("authorization").unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains(&format!(
        "oauth_signature=\"{}\"",
        percent_encode(EXPECTED_SIGNATURE)
    )));
    assert!(auth.contains("oauth_signature_method=\"HMAC-SHA1\""));
    assert!(auth.contains("oauth_version=\"1.0\""));
}

#[test]
fn token_secret_participates_in_the_signing_key() {
    let with_secret = hmac_sha1_signature(EXPECTED_BASE, CONSUMER_SECRET, TOKEN_SECRET);
    let without_secret = hmac_sha1_signature(EXPECTED_BASE, CONSUMER_SECRET, "");
    assert_ne!(with_secret, without_secret);
}

#[test]
fn signing_is_deterministic_for_identical_inputs() {
    let first = hmac_sha1_signature("base", "secret", "token-secret");
    let second = hmac_sha1_signature("base", "secret", "token-secret");
    assert_eq!(first, second);
}
