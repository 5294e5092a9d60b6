//! PostgreSQL storage implementation.
//!
//! This module provides the `PgStore` implementation of the `Store` trait.
//! Coins are `u64` in the domain and `BIGINT` in the database; values are
//! converted at this boundary.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use merch_core::{Account, AccountId, InventoryItem, PasswordHash, TransferRecord};

use crate::error::{Result, StoreError};
use crate::Store;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL-backed storage implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database at `url` with a pool of at most `max_connections`.
    ///
    /// # Errors
    ///
    /// Returns an error if the first connection cannot be established.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations, creating the schema and seeding the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn account_from_row(row: &PgRow) -> Result<Account> {
        Ok(Account {
            id: AccountId::new(to_u64(row.try_get("id")?)?),
            username: row.try_get("username")?,
            password_hash: PasswordHash::from_stored(row.try_get::<String, _>("password")?),
            coins: to_u64(row.try_get("coins")?)?,
        })
    }
}

/// Convert a database id or amount to the domain type.
fn to_u64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| StoreError::Database(format!("negative value: {value}")))
}

/// Convert a domain id to the database type.
fn id_to_db(id: AccountId) -> Result<i64> {
    i64::try_from(id.get()).map_err(|_| StoreError::NotFound)
}

/// Convert a debit amount to the database type.
///
/// No balance can exceed `i64::MAX`, so an amount above it can never be paid.
fn amount_to_db(amount: u64) -> Result<i64> {
    i64::try_from(amount).map_err(|_| StoreError::InsufficientFunds)
}

#[async_trait]
impl Store for PgStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    async fn create_account(
        &self,
        username: &str,
        password_hash: &PasswordHash,
    ) -> Result<AccountId> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(password_hash.as_str())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(AccountId::new(to_u64(row.try_get("id")?)?)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateUsername {
                    username: username.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Account> {
        let row = sqlx::query("SELECT id, username, password, coins FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Self::account_from_row(&row)
    }

    async fn get_account_by_id(&self, id: AccountId) -> Result<Account> {
        let row = sqlx::query("SELECT id, username, password, coins FROM users WHERE id = $1")
            .bind(id_to_db(id)?)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Self::account_from_row(&row)
    }

    // =========================================================================
    // Read Models
    // =========================================================================

    async fn get_inventory(&self, account_id: AccountId) -> Result<Vec<InventoryItem>> {
        let rows = sqlx::query(
            "SELECT m.name, i.quantity
             FROM inventory i
             JOIN merch m ON m.id = i.merch_id
             WHERE i.user_id = $1
             ORDER BY m.name",
        )
        .bind(id_to_db(account_id)?)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let quantity: i32 = row.try_get("quantity")?;
                Ok(InventoryItem {
                    item_type: row.try_get("name")?,
                    quantity: u32::try_from(quantity).map_err(|_| {
                        StoreError::Database(format!("negative quantity: {quantity}"))
                    })?,
                })
            })
            .collect()
    }

    async fn get_transfer_history(&self, account_id: AccountId) -> Result<Vec<TransferRecord>> {
        let rows = sqlx::query(
            "SELECT t.from_user_id, f.username AS from_username,
                    t.to_user_id, r.username AS to_username,
                    t.quantity, t.created_at
             FROM transactions t
             JOIN users f ON f.id = t.from_user_id
             JOIN users r ON r.id = t.to_user_id
             WHERE t.from_user_id = $1 OR t.to_user_id = $1
             ORDER BY t.id",
        )
        .bind(id_to_db(account_id)?)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                Ok(TransferRecord {
                    from_account_id: AccountId::new(to_u64(row.try_get("from_user_id")?)?),
                    from_username: row.try_get("from_username")?,
                    to_account_id: AccountId::new(to_u64(row.try_get("to_user_id")?)?),
                    to_username: row.try_get("to_username")?,
                    amount: to_u64(row.try_get("quantity")?)?,
                    created_at,
                })
            })
            .collect()
    }

    async fn get_merch_price(&self, name: &str) -> Result<u64> {
        let price: i64 = sqlx::query_scalar("SELECT price FROM merch WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        to_u64(price)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    async fn transfer_coins(&self, from: AccountId, to: AccountId, amount: u64) -> Result<()> {
        if from == to {
            return Err(StoreError::SelfTransfer);
        }
        let amount = amount_to_db(amount)?;
        let from = id_to_db(from).map_err(|_| StoreError::InsufficientFunds)?;
        let to = id_to_db(to).map_err(|_| StoreError::RecipientMissing)?;

        // Dropping `tx` before commit rolls back.
        let mut tx = self.pool.begin().await?;

        // Both rows are locked in id order so opposite transfers queue
        // instead of deadlocking.
        let locked: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
                .bind(vec![from, to])
                .fetch_all(&mut *tx)
                .await?;
        if !locked.contains(&to) {
            return Err(StoreError::RecipientMissing);
        }

        let debited = sqlx::query("UPDATE users SET coins = coins - $1 WHERE id = $2 AND coins >= $1")
            .bind(amount)
            .bind(from)
            .execute(&mut *tx)
            .await?;
        if debited.rows_affected() == 0 {
            return Err(StoreError::InsufficientFunds);
        }

        let credited = sqlx::query("UPDATE users SET coins = coins + $1 WHERE id = $2")
            .bind(amount)
            .bind(to)
            .execute(&mut *tx)
            .await?;
        if credited.rows_affected() == 0 {
            return Err(StoreError::RecipientMissing);
        }

        sqlx::query("INSERT INTO transactions (from_user_id, to_user_id, quantity) VALUES ($1, $2, $3)")
            .bind(from)
            .bind(to)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(from, to, amount, "Coins transferred");
        Ok(())
    }

    async fn buy_merch(&self, account_id: AccountId, item: &str, price: u64) -> Result<()> {
        let price = amount_to_db(price)?;
        let account_id = id_to_db(account_id)?;

        let mut tx = self.pool.begin().await?;

        let merch_id: i64 = sqlx::query_scalar("SELECT id FROM merch WHERE name = $1")
            .bind(item)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        let debited = sqlx::query("UPDATE users SET coins = coins - $1 WHERE id = $2 AND coins >= $1")
            .bind(price)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;
        if debited.rows_affected() == 0 {
            return Err(StoreError::InsufficientFunds);
        }

        sqlx::query(
            "INSERT INTO inventory (user_id, merch_id, quantity) VALUES ($1, $2, 1)
             ON CONFLICT (user_id, merch_id)
             DO UPDATE SET quantity = inventory.quantity + 1",
        )
        .bind(account_id)
        .bind(merch_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(account_id, item = %item, price, "Merch purchased");
        Ok(())
    }

    // =========================================================================
    // Health
    // =========================================================================

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
