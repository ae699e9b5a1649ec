// ABOUTME: Integration tests for the three-legged OAuth 1.0 flow engine
// ABOUTME: Covers request-token leg, login link, verifier exchange, and signing roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

mod common;

use common::{test_config, MockTransport, TestOauth1Adapter};
use social_login::errors::AuthError;
use social_login::flows::oauth1::{FlowStage, Oauth1Flow};
use social_login::flows::CallbackParams;
use social_login::transport::HttpMethod;
use std::sync::Arc;

fn flow_with(transport: &Arc<MockTransport>) -> Oauth1Flow {
    Oauth1Flow::new(
        Box::new(TestOauth1Adapter::new()),
        test_config(),
        Arc::clone(transport) as Arc<_>,
    )
    .unwrap()
}

const PROFILE_JSON: &str =
    r#"{"id":"7","first_name":"Grace","last_name":"Hopper","avatar":"https://cdn.example.com/grace.png"}"#;

#[tokio::test]
async fn csrf_state_is_not_supported_and_costs_no_network_call() {
    let transport = Arc::new(MockTransport::new());
    let mut flow = flow_with(&transport);

    let err = flow.login_link_uri(Some("x")).await.unwrap_err();
    assert!(matches!(err, AuthError::NotSupported(_)));
    assert_eq!(transport.request_count(), 0);
    assert_eq!(flow.state(), None);
}

#[tokio::test]
async fn login_link_embeds_the_request_token() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(200, "oauth_token=t1&oauth_token_secret=s1");

    let mut flow = flow_with(&transport);
    let uri = flow.login_link_uri(None).await.unwrap();

    assert!(uri.starts_with("https://provider.example.com/oauth/authenticate?"));
    assert!(uri.contains("oauth_token=t1"));
    assert_eq!(flow.session().stage, FlowStage::LoginLinkIssued);

    let pair = flow.session().request_token.as_ref().unwrap();
    assert_eq!(pair.token, "t1");
    assert_eq!(pair.secret, "s1");

    let requests = transport.requests();
    let token_request = &requests[0];
    assert_eq!(token_request.method, HttpMethod::Post);
    assert_eq!(
        token_request.url,
        "https://provider.example.com/oauth/request_token"
    );
    let auth = token_request.header("authorization").unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains("oauth_consumer_key=\"client-id\""));
    assert!(auth.contains("oauth_callback=\"https%3A%2F%2Fapp.example.com%2Fcallback\""));
    assert!(auth.contains("oauth_signature=\""));
}

#[tokio::test]
async fn request_token_response_missing_secret_names_the_field() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(200, "oauth_token=t1");

    let mut flow = flow_with(&transport);
    let err = flow.login_link_uri(None).await.unwrap_err();
    assert!(matches!(err, AuthError::MissingField("oauth_token_secret")));
    assert_eq!(flow.session().stage, FlowStage::Failed);
}

#[tokio::test]
async fn verifier_exchange_switches_to_the_final_token_pair() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(200, "oauth_token=t1&oauth_token_secret=s1");
    transport.push_response(200, "oauth_token=t2&oauth_token_secret=s2");
    transport.push_response(200, PROFILE_JSON);

    let mut flow = flow_with(&transport);
    flow.login_link_uri(None).await.unwrap();

    let params = CallbackParams::from_query("oauth_token=t1&oauth_verifier=v1");
    let user = flow.get_user_info(&params).await.unwrap();

    let requests = transport.requests();

    let exchange = &requests[1];
    let exchange_auth = exchange.header("authorization").unwrap();
    assert!(exchange_auth.contains("oauth_token=\"t1\""));
    assert!(exchange_auth.contains("oauth_verifier=\"v1\""));

    // The protected-resource call must be signed with the final pair.
    let info_request = &requests[2];
    let info_auth = info_request.header("authorization").unwrap();
    assert!(info_auth.contains("oauth_token=\"t2\""));
    assert!(!info_auth.contains("oauth_token=\"t1\""));
    assert!(!info_auth.contains("oauth_verifier"));

    let session = flow.session();
    assert!(session.request_token.is_none());
    let pair = session.access_token.as_ref().unwrap();
    assert_eq!(pair.token, "t2");
    assert_eq!(pair.secret, "s2");

    assert_eq!(user.id, "7");
    assert_eq!(user.provider_name, "test-oauth1");
    assert_eq!(user.photo_uri(), user.avatar.normal.as_deref());
}

#[tokio::test]
async fn hook_parameters_are_present_on_the_signed_user_info_request() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(200, "oauth_token=t1&oauth_token_secret=s1");
    transport.push_response(200, "oauth_token=t2&oauth_token_secret=s2");
    transport.push_response(200, PROFILE_JSON);

    let mut flow = flow_with(&transport);
    flow.login_link_uri(None).await.unwrap();
    let params = CallbackParams::from_query("oauth_token=t1&oauth_verifier=v1");
    flow.get_user_info(&params).await.unwrap();

    let info_request = &transport.requests()[2];
    assert!(info_request.url.contains("detail=full"));
    assert!(info_request.header("authorization").is_some());
}

#[tokio::test]
async fn callback_without_verifier_names_the_field() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(200, "oauth_token=t1&oauth_token_secret=s1");

    let mut flow = flow_with(&transport);
    flow.login_link_uri(None).await.unwrap();

    let params = CallbackParams::from_query("oauth_token=t1");
    let err = flow.get_user_info(&params).await.unwrap_err();
    assert!(matches!(err, AuthError::MissingField("oauth_verifier")));
}

#[tokio::test]
async fn user_info_before_login_leg_is_rejected() {
    let transport = Arc::new(MockTransport::new());
    let mut flow = flow_with(&transport);

    let params = CallbackParams::from_query("oauth_token=t1&oauth_verifier=v1");
    let err = flow.get_user_info(&params).await.unwrap_err();
    assert!(matches!(err, AuthError::Config(_)));
    assert_eq!(transport.request_count(), 0);
}
