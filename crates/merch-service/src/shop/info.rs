//! The account info aggregate.

use merch_core::{AccountId, CoinHistory, Info, ShopError};
use merch_store::StoreError;

use super::Shop;

impl Shop {
    /// Balance, inventory and coin history of `account_id`.
    ///
    /// The three reads run concurrently.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Unauthorized` if the account no longer exists.
    pub async fn info(&self, account_id: AccountId) -> Result<Info, ShopError> {
        let (account, inventory, records) = tokio::try_join!(
            self.store.get_account_by_id(account_id),
            self.store.get_inventory(account_id),
            self.store.get_transfer_history(account_id),
        )
        .map_err(|e| match e {
            StoreError::NotFound => ShopError::Unauthorized,
            other => other.into(),
        })?;

        Ok(Info {
            coins: account.coins,
            inventory,
            coin_history: CoinHistory::from_records(account_id, &records),
        })
    }
}

#[cfg(test)]
mod tests {
    use merch_core::{Credentials, SendCoinRequest};
    use merch_store::{MemoryStore, Store};

    use crate::shop::fakes::shop_over;

    use super::*;

    #[tokio::test]
    async fn fresh_account_has_empty_lists() {
        let store = MemoryStore::new();
        let shop = shop_over(store.clone());
        shop.login(&Credentials::new("alice", "Passw0rd")).await.unwrap();
        let alice = store.get_account_by_username("alice").await.unwrap().id;

        let info = shop.info(alice).await.unwrap();
        assert_eq!(info.coins, 0);
        assert!(info.inventory.is_empty());
        assert!(info.coin_history.sent.is_empty());
        assert!(info.coin_history.received.is_empty());
    }

    #[tokio::test]
    async fn history_counts_match_transfers() {
        let store = MemoryStore::new();
        let shop = shop_over(store.clone());
        for name in ["alice", "bob", "carol"] {
            shop.login(&Credentials::new(name, "Passw0rd")).await.unwrap();
            store.set_balance(name, 100).await.unwrap();
        }
        let alice = store.get_account_by_username("alice").await.unwrap().id;
        let bob = store.get_account_by_username("bob").await.unwrap().id;
        let carol = store.get_account_by_username("carol").await.unwrap().id;

        let to = |name: &str, amount| SendCoinRequest {
            to_user: name.into(),
            amount,
        };
        shop.send_coin(alice, &to("bob", 10)).await.unwrap();
        shop.send_coin(alice, &to("carol", 5)).await.unwrap();
        shop.send_coin(bob, &to("alice", 3)).await.unwrap();
        shop.send_coin(bob, &to("carol", 1)).await.unwrap();

        let info = shop.info(alice).await.unwrap();
        assert_eq!(info.coins, 88);
        assert_eq!(info.coin_history.sent.len(), 2);
        assert_eq!(info.coin_history.received.len(), 1);
        assert_eq!(info.coin_history.received[0].counterparty, "bob");

        let info = shop.info(carol).await.unwrap();
        assert_eq!(info.coin_history.sent.len(), 0);
        assert_eq!(info.coin_history.received.len(), 2);
    }

    #[tokio::test]
    async fn unknown_account_is_unauthorized() {
        let shop = shop_over(MemoryStore::new());
        assert_eq!(
            shop.info(AccountId::new(9)).await.unwrap_err(),
            ShopError::Unauthorized
        );
    }
}
