//! Storage layer for the merch shop.
//!
//! This crate owns all persistent state: accounts, the merch catalogue,
//! inventories and the coin transfer log.
//!
//! # Backends
//!
//! - [`PgStore`]: PostgreSQL via `sqlx`, with embedded migrations that also
//!   seed the catalogue.
//! - [`MemoryStore`]: in-process state behind a `tokio` lock, used by tests
//!   and local runs.
//!
//! # Atomicity
//!
//! `transfer_coins` and `buy_merch` are all-or-nothing. Debits are always
//! conditional on the balance covering the amount, so a committed balance is
//! never negative no matter how many requests race on the same account.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use merch_core::{Account, AccountId, InventoryItem, PasswordHash, TransferRecord};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., PostgreSQL, in-memory for testing).
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Create an account with zero coins and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateUsername` if the username is taken.
    async fn create_account(
        &self,
        username: &str,
        password_hash: &PasswordHash,
    ) -> Result<AccountId>;

    /// Get an account by username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no account has this username.
    async fn get_account_by_username(&self, username: &str) -> Result<Account>;

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    async fn get_account_by_id(&self, id: AccountId) -> Result<Account>;

    // =========================================================================
    // Read Models
    // =========================================================================

    /// List the merch owned by an account. Empty if nothing was bought.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_inventory(&self, account_id: AccountId) -> Result<Vec<InventoryItem>>;

    /// List every transfer touching an account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_transfer_history(&self, account_id: AccountId) -> Result<Vec<TransferRecord>>;

    /// Look up the price of a catalogue item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the item is not in the catalogue.
    async fn get_merch_price(&self, name: &str) -> Result<u64>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Move coins between two accounts and log the transfer atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::InsufficientFunds` if the sender's balance is too low
    ///   (or the sender doesn't exist).
    /// - `StoreError::RecipientMissing` if the recipient doesn't exist.
    /// - `StoreError::SelfTransfer` if `from` and `to` are the same account.
    ///
    /// On error nothing changes.
    async fn transfer_coins(&self, from: AccountId, to: AccountId, amount: u64) -> Result<()>;

    /// Debit `price` coins and add one unit of `item` to the account's
    /// inventory atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the item is not in the catalogue.
    /// - `StoreError::InsufficientFunds` if the balance is too low.
    ///
    /// On error nothing changes.
    async fn buy_merch(&self, account_id: AccountId, item: &str, price: u64) -> Result<()>;

    // =========================================================================
    // Health
    // =========================================================================

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot serve queries.
    async fn ping(&self) -> Result<()>;
}
