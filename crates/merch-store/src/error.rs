//! Error types for merch shop storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// An account with this username already exists.
    #[error("duplicate username: {username}")]
    DuplicateUsername {
        /// The username that was taken.
        username: String,
    },

    /// The conditional debit matched no row.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The credit step of a transfer matched no row.
    #[error("recipient not found")]
    RecipientMissing,

    /// Sender and recipient are the same account.
    #[error("self transfer")]
    SelfTransfer,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Database(format!("migration failed: {err}"))
    }
}

impl From<StoreError> for merch_core::ShopError {
    /// Map the storage outcomes that have a business meaning everywhere.
    ///
    /// `NotFound` depends on what was looked up, so callers that expect it
    /// match on it before converting; here it is a storage failure.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientFunds => Self::InsufficientFunds,
            StoreError::RecipientMissing => Self::RecipientMissing,
            StoreError::SelfTransfer => Self::SelfTransfer,
            StoreError::NotFound
            | StoreError::DuplicateUsername { .. }
            | StoreError::Database(_) => Self::Storage(err.to_string()),
        }
    }
}
