//! Common test utilities for merch-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;

use merch_core::AccountId;
use merch_service::{create_router, AppState, ServiceConfig, TokenAuthority};
use merch_store::{MemoryStore, Store};

pub const PRIVATE_PEM: &[u8] = include_bytes!("fixtures/private_key.pem");
pub const PUBLIC_PEM: &[u8] = include_bytes!("fixtures/public_key.pem");
pub const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("fixtures/other_private_key.pem");

/// Password satisfying every rule.
pub const PASSWORD: &str = "Passw0rd";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for seeding and inspecting state.
    pub store: MemoryStore,
    /// The token authority the server verifies with.
    pub tokens: Arc<TokenAuthority>,
}

impl TestHarness {
    /// Create a new test harness with an empty store and the default catalogue.
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    /// Create a harness with custom service configuration.
    pub fn with_config(config: ServiceConfig) -> Self {
        let store = MemoryStore::new();
        let tokens = Arc::new(
            TokenAuthority::from_pem(PRIVATE_PEM, PUBLIC_PEM, config.token_ttl())
                .expect("Failed to load test keys"),
        );

        let state = AppState::new(Arc::new(store.clone()), Arc::clone(&tokens), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            tokens,
        }
    }

    /// Log in through the API and return the token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .server
            .post("/api/auth")
            .json(&json!({"username": username, "password": PASSWORD}))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .expect("token missing from login response")
            .to_string()
    }

    /// Log in and set the account balance. Returns the auth header value.
    pub async fn funded_user(&self, username: &str, coins: u64) -> String {
        let token = self.login(username).await;
        self.store
            .set_balance(username, coins)
            .await
            .expect("Failed to set balance");
        Self::bearer(&token)
    }

    /// Format a token as an `Authorization` header value.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Look up an account id by username.
    pub async fn account_id(&self, username: &str) -> AccountId {
        self.store
            .get_account_by_username(username)
            .await
            .expect("account missing")
            .id
    }

    /// Current balance of an account.
    pub async fn coins(&self, username: &str) -> u64 {
        self.store
            .get_account_by_username(username)
            .await
            .expect("account missing")
            .coins
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
