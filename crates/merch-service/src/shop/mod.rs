//! Shop operations.
//!
//! `Shop` is the application core between the HTTP handlers and the store:
//! it validates credentials, provisions accounts, and runs the transfer and
//! purchase protocols. Handlers never touch the store for business writes.
//!
//! Operations are split by area:
//!
//! - [`login`]: authentication and account provisioning
//! - [`coins`]: coin transfers and merch purchases
//! - [`info`]: the account info aggregate

use std::sync::Arc;

use merch_core::{Account, AccountId, ShopError};
use merch_store::{Store, StoreError};

use crate::token::TokenIssuer;

pub mod coins;
pub mod info;
pub mod login;

#[cfg(test)]
mod fakes;

/// The shop application core.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct Shop {
    store: Arc<dyn Store>,
    tokens: Arc<dyn TokenIssuer>,
}

impl Shop {
    /// Create a shop over a store and a token issuer.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// Load the account a request is authenticated as.
    ///
    /// A valid token for an account that no longer exists is treated as
    /// unauthorized.
    async fn authenticated_account(&self, account_id: AccountId) -> Result<Account, ShopError> {
        match self.store.get_account_by_id(account_id).await {
            Ok(account) => Ok(account),
            Err(StoreError::NotFound) => {
                tracing::warn!(account_id = %account_id, "Token references unknown account");
                Err(ShopError::Unauthorized)
            }
            Err(e) => Err(e.into()),
        }
    }
}
