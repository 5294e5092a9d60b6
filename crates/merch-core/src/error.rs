//! Error types for the merch shop.

/// Result type for shop operations.
pub type Result<T> = std::result::Result<T, ShopError>;

/// Errors that can occur in shop operations.
///
/// The display strings are the client-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShopError {
    /// Username does not match the allowed shape.
    #[error("username not valid")]
    InvalidUsername,

    /// Password does not satisfy the password rules.
    #[error("password not valid")]
    InvalidPassword,

    /// Transfer amount must be at least one coin.
    #[error("amount must be positive")]
    InvalidAmount,

    /// Credentials do not match, or the authenticated account no longer exists.
    #[error("invalid username or password")]
    Unauthorized,

    /// Balance too low for the debit.
    #[error("not enough coins")]
    InsufficientFunds,

    /// Sender and recipient are the same account.
    #[error("can't send coins to yourself")]
    SelfTransfer,

    /// The transfer recipient does not exist.
    #[error("recipient not found")]
    RecipientMissing,

    /// The requested merch item is not in the catalogue.
    #[error("item not found")]
    ItemNotFound,

    /// Token could not be issued.
    #[error("token error: {0}")]
    Token(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ShopError {
    /// Whether this error is an infrastructure failure rather than a business rejection.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Token(_) | Self::Storage(_))
    }
}
