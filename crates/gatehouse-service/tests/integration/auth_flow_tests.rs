//! P1 Integration tests for the login flow.
//!
//! Covers credential validation through the HTTP surface: success for
//! both secret schemes, the uniform failure response, and store errors.

use crate::harness::{self, LOGIN_ROUTE, TOKEN_TTL_SECONDS};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use gatehouse_service::models::SecretScheme;
use gatehouse_service::store::mock::FailingStore;
use gatehouse_service::store::{Credential, MemoryCredentialStore};
use gatehouse_test_utils::clock::FixedClock;
use gatehouse_test_utils::fixtures::{
    bcrypt_hash_of, test_signing_key, TEST_EPOCH, TEST_KEY_ID, TEST_PASSWORD, TEST_USERNAME_ALICE,
};
use gatehouse_test_utils::TokenAssertions;
use std::sync::Arc;
use tower::ServiceExt;

fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_timestamp(TEST_EPOCH))
}

// ============================================================================
// Login success
// ============================================================================

/// P1-1: Valid credentials return a signed bearer token.
#[tokio::test]
async fn test_login_with_valid_credentials_returns_token() {
    // Arrange
    let app = harness::test_app(fixed_clock());

    // Act
    let response = harness::post_login(app, TEST_USERNAME_ALICE, TEST_PASSWORD).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body = harness::body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], TOKEN_TTL_SECONDS);

    let token = body["token"]
        .as_str()
        .expect("Response should carry a token")
        .to_string();
    token
        .assert_valid_jwt()
        .assert_for_subject(TEST_USERNAME_ALICE)
        .assert_expires_at(TEST_EPOCH + TOKEN_TTL_SECONDS)
        .assert_signed_with(&test_signing_key(1))
        .assert_has_kid(TEST_KEY_ID);
}

/// P1-2: Valid credentials verify against a bcrypt-hashed store.
#[tokio::test]
async fn test_login_with_bcrypt_hashed_store() {
    let store = Arc::new(MemoryCredentialStore::with_users([Credential {
        username: TEST_USERNAME_ALICE.to_string(),
        secret: bcrypt_hash_of(TEST_PASSWORD),
    }]));
    let app = harness::test_app_with(fixed_clock(), store, SecretScheme::Bcrypt, 0);

    let response = harness::post_login(app, TEST_USERNAME_ALICE, TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Login failure
// ============================================================================

/// P1-3: A wrong password is rejected with the opaque message.
#[tokio::test]
async fn test_login_with_wrong_password_rejected() {
    let app = harness::test_app(fixed_clock());

    let response = harness::post_login(app, TEST_USERNAME_ALICE, "not-the-password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = harness::body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    assert_eq!(body["error"]["message"], "Incorrect username or password");
}

/// P1-4: Unknown usernames and wrong passwords are indistinguishable.
#[tokio::test]
async fn test_login_failure_responses_are_identical() {
    let app = harness::test_app(fixed_clock());

    let wrong_password =
        harness::post_login(app.clone(), TEST_USERNAME_ALICE, "not-the-password").await;
    let unknown_user = harness::post_login(app, "mallory", TEST_PASSWORD).await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password_body = harness::body_json(wrong_password).await;
    let unknown_user_body = harness::body_json(unknown_user).await;
    assert_eq!(wrong_password_body, unknown_user_body);
}

/// P1-5: A failing credential store surfaces as a generic 500.
#[tokio::test]
async fn test_login_store_failure_is_internal_error() {
    let app = harness::test_app_with(
        fixed_clock(),
        Arc::new(FailingStore),
        SecretScheme::Plaintext,
        0,
    );

    let response = harness::post_login(app, TEST_USERNAME_ALICE, TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = harness::body_json(response).await;
    assert_eq!(body["error"]["code"], "STORE_ERROR");
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

// ============================================================================
// Request shape
// ============================================================================

/// P1-6: A malformed request body never reaches the authenticator.
#[tokio::test]
async fn test_login_with_malformed_body_is_client_error() {
    let app = harness::test_app(fixed_clock());

    let request = Request::builder()
        .method(Method::POST)
        .uri(LOGIN_ROUTE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("Request should build");
    let response = app.oneshot(request).await.expect("App should respond");

    assert!(response.status().is_client_error());
}

/// P1-7: The login route only accepts POST.
#[tokio::test]
async fn test_login_route_rejects_get() {
    let app = harness::test_app(fixed_clock());

    let response = harness::get_with_token(app, LOGIN_ROUTE, None).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
