//! Login and token integration tests.

mod common;

use std::future::IntoFuture;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use common::{TestHarness, OTHER_PRIVATE_PEM, PASSWORD, PRIVATE_PEM};
use merch_service::TOKEN_AUDIENCE;

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn first_login_creates_account() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth")
        .json(&json!({"username": "alice", "password": "Passw0rd"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().unwrap();

    let id = harness.account_id("alice").await;
    assert_eq!(harness.tokens.verify(token).unwrap(), id);
    assert_eq!(harness.coins("alice").await, 0);
}

#[tokio::test]
async fn relogin_with_wrong_password_fails() {
    let harness = TestHarness::new();
    harness.login("alice").await;

    let response = harness
        .server
        .post("/api/auth")
        .json(&json!({"username": "alice", "password": "Wrongpw1"}))
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "invalid username or password"}));
}

#[tokio::test]
async fn relogin_with_right_password_keeps_account() {
    let harness = TestHarness::new();
    let first = harness.login("alice").await;
    let second = harness.login("alice").await;

    assert_eq!(
        harness.tokens.verify(&first).unwrap(),
        harness.tokens.verify(&second).unwrap()
    );
}

#[tokio::test]
async fn username_shape_boundaries() {
    let harness = TestHarness::new();

    for (username, accepted) in [
        ("ab", false),
        ("abc", true),
        ("a23456789012345", true),
        ("a234567890123456", false),
        ("bad_name", false),
    ] {
        let response = harness
            .server
            .post("/api/auth")
            .json(&json!({"username": username, "password": PASSWORD}))
            .await;

        if accepted {
            response.assert_status_ok();
        } else {
            response.assert_status_bad_request();
            response.assert_json(&json!({"error": "username not valid"}));
        }
    }
}

#[tokio::test]
async fn password_missing_a_class_is_rejected() {
    let harness = TestHarness::new();

    for password in ["password1", "PASSWORD1", "Password", "Pw1"] {
        let response = harness
            .server
            .post("/api/auth")
            .json(&json!({"username": "alice", "password": password}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"error": "password not valid"}));
    }
}

// ============================================================================
// Request bodies
// ============================================================================

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({"error": "failed to parse the request body"}));
}

#[tokio::test]
async fn missing_or_empty_fields_are_validation_errors() {
    let harness = TestHarness::new();

    for body in [
        json!({"username": "alice"}),
        json!({"password": PASSWORD}),
        json!({"username": "", "password": PASSWORD}),
    ] {
        let response = harness.server.post("/api/auth").json(&body).await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"error": "failed to validate the structure of request body"}));
    }
}

// ============================================================================
// Bearer tokens
// ============================================================================

#[tokio::test]
async fn missing_header_is_rejected() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/info").await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({
        "error": "the Authorization header is empty or does not contain Bearer token"
    }));
}

#[tokio::test]
async fn empty_bearer_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/info")
        .add_header("authorization", "Bearer   ")
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({
        "error": "the Authorization header is empty or does not contain Bearer token"
    }));
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/info")
        .add_header("authorization", "Bearer not.a.token")
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "invalid token"}));
}

#[tokio::test]
async fn foreign_signature_is_rejected() {
    let harness = TestHarness::new();
    harness.login("alice").await;
    let id = harness.account_id("alice").await;

    let now = Utc::now().timestamp();
    let token = encode(
        &Header::new(Algorithm::RS256),
        &json!({"sub": id.to_string(), "aud": TOKEN_AUDIENCE, "exp": now + 3600}),
        &EncodingKey::from_rsa_pem(OTHER_PRIVATE_PEM).unwrap(),
    )
    .unwrap();

    let response = harness
        .server
        .get("/api/info")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "invalid token"}));
}

#[tokio::test]
async fn token_for_unknown_account_is_unauthorized() {
    let harness = TestHarness::new();

    let now = Utc::now().timestamp();
    let token = encode(
        &Header::new(Algorithm::RS256),
        &json!({"sub": "999", "aud": TOKEN_AUDIENCE, "exp": now + 3600}),
        &EncodingKey::from_rsa_pem(PRIVATE_PEM).unwrap(),
    )
    .unwrap();

    let response = harness
        .server
        .get("/api/info")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "invalid username or password"}));
}

#[tokio::test]
async fn concurrent_first_logins_yield_same_account() {
    let harness = TestHarness::new();
    let body = json!({"username": "alice", "password": PASSWORD});

    let (a, b) = futures::join!(
        harness.server.post("/api/auth").json(&body).into_future(),
        harness.server.post("/api/auth").json(&body).into_future(),
    );

    a.assert_status_ok();
    b.assert_status_ok();
    let token_a = a.json::<serde_json::Value>()["token"].as_str().unwrap().to_string();
    let token_b = b.json::<serde_json::Value>()["token"].as_str().unwrap().to_string();
    assert_eq!(
        harness.tokens.verify(&token_a).unwrap(),
        harness.tokens.verify(&token_b).unwrap()
    );
}
