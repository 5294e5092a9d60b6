//! Coin transfer types and the account info aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, InventoryItem};

/// A committed coin transfer, as read back from the transfer log.
///
/// Both endpoints are carried so the reader can decide the direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Sending account.
    pub from_account_id: AccountId,
    /// Sender's username.
    pub from_username: String,
    /// Receiving account.
    pub to_account_id: AccountId,
    /// Recipient's username.
    pub to_username: String,
    /// Coins moved.
    pub amount: u64,
    /// When the transfer was committed.
    pub created_at: DateTime<Utc>,
}

/// One entry of the coin history as seen by one account.
///
/// `fromUser` holds the counterparty in both the sent and received lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTransaction {
    /// Counterparty username.
    #[serde(rename = "fromUser")]
    pub counterparty: String,
    /// Coins moved.
    pub amount: u64,
}

/// Coin history of one account, split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinHistory {
    /// Transfers where the account was the recipient.
    pub received: Vec<CoinTransaction>,
    /// Transfers where the account was the sender.
    pub sent: Vec<CoinTransaction>,
}

impl CoinHistory {
    /// Partition transfer log rows from the point of view of `account_id`.
    ///
    /// Rows that do not involve the account are ignored. A row where the
    /// account is both sender and recipient cannot be committed, but would
    /// be listed in both directions.
    #[must_use]
    pub fn from_records(account_id: AccountId, records: &[TransferRecord]) -> Self {
        let mut history = Self::default();

        for record in records {
            if record.from_account_id == account_id {
                history.sent.push(CoinTransaction {
                    counterparty: record.to_username.clone(),
                    amount: record.amount,
                });
            }
            if record.to_account_id == account_id {
                history.received.push(CoinTransaction {
                    counterparty: record.from_username.clone(),
                    amount: record.amount,
                });
            }
        }

        history
    }
}

/// Read-only projection of an account: balance, inventory and coin history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Current balance.
    pub coins: u64,
    /// Owned merch; empty when nothing was bought.
    pub inventory: Vec<InventoryItem>,
    /// Transfers in and out.
    #[serde(rename = "coinHistory")]
    pub coin_history: CoinHistory,
}

/// Request to move coins to another account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCoinRequest {
    /// Recipient username.
    #[serde(rename = "toUser")]
    pub to_user: String,
    /// Coins to move; at least one.
    pub amount: u64,
}
