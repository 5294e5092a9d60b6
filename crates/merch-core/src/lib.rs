//! Core types for the merch shop.
//!
//! This crate provides the foundational types shared by the store and the HTTP service:
//!
//! - **Identifiers**: `AccountId`
//! - **Accounts**: `Account`, `Credentials`, `PasswordHash`
//! - **Catalogue**: `MerchItem`, `InventoryItem`
//! - **Transfers**: `TransferRecord`, `CoinTransaction`, `CoinHistory`, `Info`
//! - **Errors**: `ShopError`
//!
//! # Coins
//!
//! Coins are whole, non-negative units stored as `u64`. Purchases and transfers
//! only ever debit an account through a conditional update, so no committed
//! balance can go below zero.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod error;
pub mod ids;
pub mod merch;
pub mod transfer;

pub use account::{
    validate_password, validate_username, Account, Credentials, PasswordHash,
    PASSWORD_MAX_LEN, PASSWORD_MIN_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
pub use error::{Result, ShopError};
pub use ids::{AccountId, IdError};
pub use merch::{InventoryItem, MerchItem, DEFAULT_CATALOGUE};
pub use transfer::{CoinHistory, CoinTransaction, Info, SendCoinRequest, TransferRecord};
