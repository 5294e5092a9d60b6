//! Test doubles for the shop's seams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use merch_core::{Account, AccountId, InventoryItem, PasswordHash, TransferRecord};
use merch_store::{MemoryStore, Result, Store, StoreError};

use crate::token::{TokenError, TokenIssuer};

use super::Shop;

/// Issues `token-<id>` strings.
pub(crate) struct FakeIssuer;

impl FakeIssuer {
    pub(crate) fn token_for(account_id: AccountId) -> String {
        format!("token-{account_id}")
    }
}

impl TokenIssuer for FakeIssuer {
    fn issue(&self, account_id: AccountId) -> std::result::Result<String, TokenError> {
        Ok(Self::token_for(account_id))
    }
}

pub(crate) fn shop_over(store: MemoryStore) -> Shop {
    Shop::new(Arc::new(store), Arc::new(FakeIssuer))
}

/// A store whose every operation fails.
pub(crate) struct FailingStore;

fn unavailable<T>() -> Result<T> {
    Err(StoreError::Database("connection refused".into()))
}

#[async_trait]
impl Store for FailingStore {
    async fn create_account(&self, _: &str, _: &PasswordHash) -> Result<AccountId> {
        unavailable()
    }

    async fn get_account_by_username(&self, _: &str) -> Result<Account> {
        unavailable()
    }

    async fn get_account_by_id(&self, _: AccountId) -> Result<Account> {
        unavailable()
    }

    async fn get_inventory(&self, _: AccountId) -> Result<Vec<InventoryItem>> {
        unavailable()
    }

    async fn get_transfer_history(&self, _: AccountId) -> Result<Vec<TransferRecord>> {
        unavailable()
    }

    async fn get_merch_price(&self, _: &str) -> Result<u64> {
        unavailable()
    }

    async fn transfer_coins(&self, _: AccountId, _: AccountId, _: u64) -> Result<()> {
        unavailable()
    }

    async fn buy_merch(&self, _: AccountId, _: &str, _: u64) -> Result<()> {
        unavailable()
    }

    async fn ping(&self) -> Result<()> {
        unavailable()
    }
}

/// Reports the first username lookup as missing, as if another request
/// created the account between this request's lookup and its insert.
pub(crate) struct RacingStore {
    inner: MemoryStore,
    missed: AtomicBool,
}

impl RacingStore {
    pub(crate) fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            missed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Store for RacingStore {
    async fn create_account(&self, username: &str, hash: &PasswordHash) -> Result<AccountId> {
        self.inner.create_account(username, hash).await
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Account> {
        if !self.missed.swap(true, Ordering::SeqCst) {
            return Err(StoreError::NotFound);
        }
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
        self.inner.buy_merch(id, item, price).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}
