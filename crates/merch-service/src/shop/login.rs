//! Login and account provisioning.

use merch_core::{Account, AccountId, Credentials, PasswordHash, ShopError};
use merch_store::StoreError;

use super::Shop;

impl Shop {
    /// Authenticate `credentials` and return a token.
    ///
    /// An unknown username is registered on the spot with zero coins. When two
    /// first logins for the same username race, the loser re-reads the
    /// winner's account and verifies its password against it.
    ///
    /// # Errors
    ///
    /// - `ShopError::InvalidUsername` / `ShopError::InvalidPassword` for
    ///   credentials of the wrong shape.
    /// - `ShopError::Unauthorized` if the password does not match.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ShopError> {
        credentials.validate()?;

        let account_id = match self.store.get_account_by_username(&credentials.username).await {
            Ok(account) => check_password(&account, &credentials.password)?,
            Err(StoreError::NotFound) => self.register(credentials).await?,
            Err(e) => return Err(e.into()),
        };

        Ok(self.tokens.issue(account_id)?)
    }

    async fn register(&self, credentials: &Credentials) -> Result<AccountId, ShopError> {
        let hash = PasswordHash::from_plaintext(&credentials.password);

        match self.store.create_account(&credentials.username, &hash).await {
            Ok(account_id) => {
                tracing::info!(
                    account_id = %account_id,
                    username = %credentials.username,
                    "Account created"
                );
                Ok(account_id)
            }
            Err(StoreError::DuplicateUsername { .. }) => {
                tracing::debug!(
                    username = %credentials.username,
                    "Concurrent first login, re-reading account"
                );
                let account = self
                    .store
                    .get_account_by_username(&credentials.username)
                    .await?;
                check_password(&account, &credentials.password)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn check_password(account: &Account, password: &str) -> Result<AccountId, ShopError> {
    if account.password_hash.verify(password) {
        Ok(account.id)
    } else {
        tracing::info!(account_id = %account.id, "Login rejected: wrong password");
        Err(ShopError::Unauthorized)
    }
}
