//! In-memory storage implementation.
//!
//! `MemoryStore` keeps all state behind one `tokio` read-write lock. Every
//! mutating operation holds the write lock for its whole duration, which makes
//! each compound operation atomic with respect to every other one.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use merch_core::{
    Account, AccountId, InventoryItem, MerchItem, PasswordHash, TransferRecord, DEFAULT_CATALOGUE,
};

use crate::error::{Result, StoreError};
use crate::Store;

#[derive(Debug)]
struct TransferRow {
    from: AccountId,
    to: AccountId,
    amount: u64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    ids_by_username: HashMap<String, AccountId>,
    merch: Vec<MerchItem>,
    /// Keyed by (account, merch id).
    inventory: BTreeMap<(AccountId, u64), u32>,
    transfers: Vec<TransferRow>,
    next_account_id: u64,
}

impl State {
    fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    fn username(&self, id: AccountId) -> Result<String> {
        self.accounts
            .get(&id)
            .map(|a| a.username.clone())
            .ok_or_else(|| StoreError::Database(format!("dangling account reference: {id}")))
    }
}

/// In-memory storage implementation.
///
/// Cloning shares the underlying state.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Create a store seeded with the default catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalogue(DEFAULT_CATALOGUE)
    }

    /// Create a store seeded with the given `(name, price)` catalogue.
    #[must_use]
    pub fn with_catalogue(catalogue: &[(&str, u64)]) -> Self {
        let merch = catalogue
            .iter()
            .zip(1u64..)
            .map(|(&(name, price), id)| MerchItem {
                id,
                name: name.to_string(),
                price,
            })
            .collect();

        let state = State {
            merch,
            next_account_id: 1,
            ..State::default()
        };

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Overwrite the balance of an account.
    ///
    /// Coins only enter the shop through this administrative path; the HTTP
    /// surface never mints them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no account has this username.
    pub async fn set_balance(&self, username: &str, coins: u64) -> Result<()> {
        let mut state = self.state.write().await;
        let id = *state
            .ids_by_username
            .get(username)
            .ok_or(StoreError::NotFound)?;
        let account = state.account_mut(id).ok_or(StoreError::NotFound)?;
        account.coins = coins;
        Ok(())
    }

    /// Number of transfers logged so far.
    pub async fn transfer_count(&self) -> usize {
        self.state.read().await.transfers.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    async fn create_account(
        &self,
        username: &str,
        password_hash: &PasswordHash,
    ) -> Result<AccountId> {
        let mut state = self.state.write().await;

        if state.ids_by_username.contains_key(username) {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let id = AccountId::new(state.next_account_id);
        state.next_account_id += 1;

        state.ids_by_username.insert(username.to_string(), id);
        state.accounts.insert(
            id,
            Account {
                id,
                username: username.to_string(),
                password_hash: password_hash.clone(),
                coins: 0,
            },
        );

        Ok(id)
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Account> {
        let state = self.state.read().await;
        state
            .ids_by_username
            .get(username)
            .and_then(|id| state.accounts.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account> {
        let state = self.state.read().await;
        state.accounts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    // =========================================================================
    // Read Models
    // =========================================================================

    async fn get_inventory(&self, account_id: AccountId) -> Result<Vec<InventoryItem>> {
        let state = self.state.read().await;

        let mut items: Vec<InventoryItem> = state
            .inventory
            .range((account_id, 0)..=(account_id, u64::MAX))
            .filter_map(|(&(_, merch_id), &quantity)| {
                state
                    .merch
                    .iter()
                    .find(|m| m.id == merch_id)
                    .map(|m| InventoryItem {
                        item_type: m.name.clone(),
                        quantity,
                    })
            })
            .collect();
        items.sort_by(|a, b| a.item_type.cmp(&b.item_type));

        Ok(items)
    }

    async fn get_transfer_history(&self, account_id: AccountId) -> Result<Vec<TransferRecord>> {
        let state = self.state.read().await;

        state
            .transfers
            .iter()
            .filter(|t| t.from == account_id || t.to == account_id)
            .map(|t| {
                Ok(TransferRecord {
                    from_account_id: t.from,
                    from_username: state.username(t.from)?,
                    to_account_id: t.to,
                    to_username: state.username(t.to)?,
                    amount: t.amount,
                    created_at: t.created_at,
                })
            })
            .collect()
    }

    async fn get_merch_price(&self, name: &str) -> Result<u64> {
        let state = self.state.read().await;
        state
            .merch
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.price)
            .ok_or(StoreError::NotFound)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    async fn transfer_coins(&self, from: AccountId, to: AccountId, amount: u64) -> Result<()> {
        if from == to {
            return Err(StoreError::SelfTransfer);
        }
        let mut state = self.state.write().await;

        // Validate both legs before touching either balance.
        match state.accounts.get(&from) {
            Some(sender) if sender.can_afford(amount) => {}
            _ => return Err(StoreError::InsufficientFunds),
        }
        let recipient_coins = state
            .accounts
            .get(&to)
            .ok_or(StoreError::RecipientMissing)?
            .coins;
        if recipient_coins.checked_add(amount).is_none() {
            return Err(StoreError::Database("balance overflow".into()));
        }

        if let Some(sender) = state.account_mut(from) {
            sender.coins -= amount;
        }
        if let Some(recipient) = state.account_mut(to) {
            recipient.coins += amount;
        }

        state.transfers.push(TransferRow {
            from,
            to,
            amount,
            created_at: Utc::now(),
        });

        tracing::debug!(from = %from, to = %to, amount, "Coins transferred");
        Ok(())
    }

    async fn buy_merch(&self, account_id: AccountId, item: &str, price: u64) -> Result<()> {
        let mut state = self.state.write().await;

        let merch_id = state
            .merch
            .iter()
            .find(|m| m.name == item)
            .map(|m| m.id)
            .ok_or(StoreError::NotFound)?;

        let account = state
            .account_mut(account_id)
            .ok_or(StoreError::InsufficientFunds)?;
        if !account.can_afford(price) {
            return Err(StoreError::InsufficientFunds);
        }
        account.coins -= price;

        *state.inventory.entry((account_id, merch_id)).or_insert(0) += 1;

        tracing::debug!(account_id = %account_id, item = %item, price, "Merch purchased");
        Ok(())
    }

    // =========================================================================
    // Health
    // =========================================================================

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
