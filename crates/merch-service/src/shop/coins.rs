//! Coin transfers and merch purchases.

use merch_core::{AccountId, SendCoinRequest, ShopError};
use merch_store::StoreError;

use super::Shop;

impl Shop {
    /// Send coins from `sender_id` to the account named in `request`.
    ///
    /// # Errors
    ///
    /// - `ShopError::InvalidAmount` for a zero amount.
    /// - `ShopError::Unauthorized` if the sender no longer exists.
    /// - `ShopError::InsufficientFunds` if the sender cannot cover the amount.
    /// - `ShopError::RecipientMissing` if no account has the recipient name.
    /// - `ShopError::SelfTransfer` if the recipient is the sender.
    pub async fn send_coin(
        &self,
        sender_id: AccountId,
        request: &SendCoinRequest,
    ) -> Result<(), ShopError> {
        if request.amount == 0 {
            return Err(ShopError::InvalidAmount);
        }

        let sender = self.authenticated_account(sender_id).await?;
        if !sender.can_afford(request.amount) {
            tracing::debug!(
                account_id = %sender_id,
                balance = sender.coins,
                amount = request.amount,
                "Transfer rejected: insufficient funds"
            );
            return Err(ShopError::InsufficientFunds);
        }

        let recipient = match self.store.get_account_by_username(&request.to_user).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => return Err(ShopError::RecipientMissing),
            Err(e) => return Err(e.into()),
        };

        if recipient.id == sender.id {
            return Err(ShopError::SelfTransfer);
        }

        self.store
            .transfer_coins(sender.id, recipient.id, request.amount)
            .await?;

        tracing::info!(
            from = %sender.id,
            to = %recipient.id,
            amount = request.amount,
            "Coins sent"
        );
        Ok(())
    }

    /// Buy one unit of `item` for `account_id`.
    ///
    /// # Errors
    ///
    /// - `ShopError::ItemNotFound` if the item is not in the catalogue.
    /// - `ShopError::Unauthorized` if the account no longer exists.
    /// - `ShopError::InsufficientFunds` if the account cannot cover the price.
    pub async fn buy_merch(&self, account_id: AccountId, item: &str) -> Result<(), ShopError> {
        let price = match self.store.get_merch_price(item).await {
            Ok(price) => price,
            Err(StoreError::NotFound) => return Err(ShopError::ItemNotFound),
            Err(e) => return Err(e.into()),
        };

        let account = self.authenticated_account(account_id).await?;
        if !account.can_afford(price) {
            tracing::debug!(
                account_id = %account_id,
                balance = account.coins,
                price,
                "Purchase rejected: insufficient funds"
            );
            return Err(ShopError::InsufficientFunds);
        }

        match self.store.buy_merch(account_id, item, price).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => return Err(ShopError::ItemNotFound),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(account_id = %account_id, item = %item, price, "Merch bought");
        Ok(())
    }
}
