//! Request deadline integration tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use merch_core::{Account, AccountId, InventoryItem, PasswordHash, TransferRecord};
use merch_service::{create_router, AppState, ServiceConfig, TokenAuthority};
use merch_store::{MemoryStore, Result, Store};

use common::{TestHarness, PASSWORD, PRIVATE_PEM, PUBLIC_PEM};

/// Delegates to a `MemoryStore` but stalls every purchase.
struct SlowPurchases {
    inner: MemoryStore,
    delay: Duration,
}

#[async_trait]
impl Store for SlowPurchases {
    async fn create_account(&self, username: &str, hash: &PasswordHash) -> Result<AccountId> {
        self.inner.create_account(username, hash).await
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Account> {
        self.inner.get_account_by_username(username).await
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account> {
        self.inner.get_account_by_id(id).await
    }

    async fn get_inventory(&self, id: AccountId) -> Result<Vec<InventoryItem>> {
        self.inner.get_inventory(id).await
    }

    async fn get_transfer_history(&self, id: AccountId) -> Result<Vec<TransferRecord>> {
        self.inner.get_transfer_history(id).await
    }

    async fn get_merch_price(&self, name: &str) -> Result<u64> {
        self.inner.get_merch_price(name).await
    }

    async fn transfer_coins(&self, from: AccountId, to: AccountId, amount: u64) -> Result<()> {
        self.inner.transfer_coins(from, to, amount).await
    }

    async fn buy_merch(&self, id: AccountId, item: &str, price: u64) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.buy_merch(id, item, price).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn slow_request_gets_json_408_and_no_effect() {
    let inner = MemoryStore::new();
    let store = SlowPurchases {
        inner: inner.clone(),
        delay: Duration::from_secs(10),
    };
    let config = ServiceConfig {
        request_timeout_seconds: 1,
        ..ServiceConfig::default()
    };
    let tokens = Arc::new(
        TokenAuthority::from_pem(PRIVATE_PEM, PUBLIC_PEM, config.token_ttl())
            .expect("Failed to load test keys"),
    );
    let server = TestServer::new(create_router(AppState::new(
        Arc::new(store),
        Arc::clone(&tokens),
        config,
    )))
    .expect("Failed to create test server");

    let token: serde_json::Value = server
        .post("/api/auth")
        .json(&json!({"username": "alice", "password": PASSWORD}))
        .await
        .json();
    inner.set_balance("alice", 100).await.unwrap();
    let auth = TestHarness::bearer(token["token"].as_str().unwrap());

    let response = server
        .get("/api/buy/cup")
        .add_header("Authorization", auth)
        .await;

    response.assert_status(StatusCode::REQUEST_TIMEOUT);
    response.assert_json(&json!({"error": "request timed out"}));

    let alice = inner.get_account_by_username("alice").await.unwrap();
    assert_eq!(alice.coins, 100);
    assert!(inner.get_inventory(alice.id).await.unwrap().is_empty());
}
