//! Account types for the merch shop.
//!
//! This module defines the account record, login credentials, the password
//! hash function, and the shape rules applied to credentials before any
//! store lookup happens.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, ShopError};

// ============================================================================
// Constants
// ============================================================================

/// Minimum username length.
pub const USERNAME_MIN_LEN: usize = 3;

/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 15;

/// Minimum password length.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Maximum password length.
pub const PASSWORD_MAX_LEN: usize = 64;

/// An employee account.
///
/// Accounts are created with zero coins on the first login of an unknown
/// username and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-generated identifier.
    pub id: AccountId,

    /// Unique, immutable login name.
    pub username: String,

    /// Hash of the login password.
    pub password_hash: PasswordHash,

    /// Current coin balance.
    pub coins: u64,
}

impl Account {
    /// Check if the account can afford a debit of `amount` coins.
    #[must_use]
    pub fn can_afford(&self, amount: u64) -> bool {
        self.coins >= amount
    }
}

/// Login credentials as submitted by a client.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,

    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Create credentials from a username and plaintext password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check both fields against the credential shape rules.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidUsername` or `ShopError::InvalidPassword`.
    pub fn validate(&self) -> Result<(), ShopError> {
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A stored password hash.
///
/// The hash is the standard (padded) base64 encoding of the raw SHA-256
/// digest of the UTF-8 password bytes. It carries no salt; replacing the
/// function only requires changing this type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password.
    #[must_use]
    pub fn from_plaintext(password: &str) -> Self {
        let digest = Sha256::digest(password.as_bytes());
        Self(STANDARD.encode(digest))
    }

    /// Wrap an already-computed hash (as read from the store).
    #[must_use]
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Hash `password` and compare the result byte-for-byte with this hash.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        Self::from_plaintext(password).0.as_bytes() == self.0.as_bytes()
    }

    /// Return the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validate a username: `^[A-Za-z0-9]{3,15}$`.
///
/// # Errors
///
/// Returns `ShopError::InvalidUsername` if the username does not match.
pub fn validate_username(username: &str) -> Result<(), ShopError> {
    let len = username.len();
    let shape_ok = (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len)
        && username.bytes().all(|b| b.is_ascii_alphanumeric());

    if shape_ok {
        Ok(())
    } else {
        Err(ShopError::InvalidUsername)
    }
}

/// Validate a password: 8 to 64 characters with at least one uppercase
/// letter, one lowercase letter and one digit.
///
/// # Errors
///
/// Returns `ShopError::InvalidPassword` if any rule fails.
pub fn validate_password(password: &str) -> Result<(), ShopError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ShopError::InvalidPassword);
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ShopError::InvalidPassword)
    }
}
