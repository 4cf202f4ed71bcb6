//! P1 Integration tests for the request filter.
//!
//! Covers the three filter outcomes: pass-through for public paths,
//! authenticated access with a valid token, and rejection with one
//! opaque message for every bad-token shape.

use crate::harness;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use gatehouse_test_utils::clock::FixedClock;
use gatehouse_test_utils::fixtures::{
    test_signing_key, TEST_EPOCH, TEST_PASSWORD, TEST_USERNAME_ALICE,
};
use gatehouse_test_utils::token_builders::TestTokenBuilder;
use std::sync::Arc;
use tower::ServiceExt;

const UNIFORM_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_timestamp(TEST_EPOCH))
}

// ============================================================================
// Pass-through
// ============================================================================

/// P1-1: The health probe is public.
#[tokio::test]
async fn test_health_is_reachable_without_token() {
    let app = harness::test_app(fixed_clock());

    let response = harness::get_with_token(app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness::body_text(response).await, "OK");
}

/// P1-2: The login route passes through the filter to the handler.
#[tokio::test]
async fn test_login_route_passes_through_filter() {
    let app = harness::test_app(fixed_clock());

    // No Authorization header, bad credentials: an INVALID_CREDENTIALS
    // rejection proves the request reached the login handler instead of
    // being stopped by the filter
    let response = harness::post_login(app, TEST_USERNAME_ALICE, "not-the-password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = harness::body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

// ============================================================================
// Authenticated access
// ============================================================================

/// P1-3: A valid token reaches the protected handler with its claims.
#[tokio::test]
async fn test_valid_token_reaches_protected_handler() {
    let clock = fixed_clock();
    let app = harness::test_app(clock);

    let login = harness::post_login(app.clone(), TEST_USERNAME_ALICE, TEST_PASSWORD).await;
    let token = harness::body_json(login).await["token"]
        .as_str()
        .expect("Login should return a token")
        .to_string();

    let response = harness::get_with_token(app, "/hello", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness::body_text(response).await, "Hello, alice!");
}

/// P1-4: An authenticated request to an unknown path is a plain 404.
#[tokio::test]
async fn test_valid_token_on_unknown_path_is_not_found() {
    let app = harness::test_app(fixed_clock());

    let token = TestTokenBuilder::new().build();
    let response = harness::get_with_token(app, "/nope", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Rejection
// ============================================================================

/// P1-5: A protected path without a token is rejected.
#[tokio::test]
async fn test_missing_token_rejected() {
    let app = harness::test_app(fixed_clock());

    let response = harness::get_with_token(app, "/hello", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = harness::body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    assert_eq!(body["error"]["message"], "Missing Authorization header");
}

/// P1-6: Unknown paths are protected by default.
#[tokio::test]
async fn test_unknown_path_without_token_rejected() {
    let app = harness::test_app(fixed_clock());

    let response = harness::get_with_token(app, "/nope", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// P1-7: A non-Bearer Authorization header is rejected.
#[tokio::test]
async fn test_non_bearer_authorization_rejected() {
    let app = harness::test_app(fixed_clock());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/hello")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cHc=")
        .body(Body::empty())
        .expect("Request should build");
    let response = app.oneshot(request).await.expect("App should respond");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = harness::body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "Invalid Authorization header format"
    );
}

/// P1-8: Garbage, expired, wrong-key, and tampered tokens all produce
/// the same opaque rejection.
#[tokio::test]
async fn test_bad_tokens_share_one_rejection() {
    let app = harness::test_app(fixed_clock());

    let expired = TestTokenBuilder::new()
        .issued_at(TEST_EPOCH - 7200)
        .expires_at(TEST_EPOCH - 3600)
        .build();
    let wrong_key = TestTokenBuilder::new()
        .signed_with(&test_signing_key(9))
        .build();
    let mut tampered = TestTokenBuilder::new().build();
    let last = tampered.pop().expect("Token should not be empty");
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let mut bodies = Vec::new();
    for token in [
        "garbage".to_string(),
        expired,
        wrong_key,
        tampered,
    ] {
        let response = harness::get_with_token(app.clone(), "/hello", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(harness::body_json(response).await);
    }

    for body in &bodies {
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
        assert_eq!(body["error"]["message"], UNIFORM_TOKEN_MESSAGE);
        assert_eq!(body, &bodies[0]);
    }
}
