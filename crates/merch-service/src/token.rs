//! Access tokens.
//!
//! Tokens are RS256 JWTs whose `sub` claim is the decimal account id.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use merch_core::{AccountId, ShopError};

/// Audience claim carried by every token this service issues.
pub const TOKEN_AUDIENCE: &str = "merch-shop";

/// Errors from minting or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Key material could not be decoded.
    #[error("invalid key material: {0}")]
    Key(String),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The token is malformed, expired, wrongly signed or has bad claims.
    #[error("invalid token")]
    InvalidToken,
}

impl From<TokenError> for ShopError {
    fn from(err: TokenError) -> Self {
        Self::Token(err.to_string())
    }
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id, decimal).
    pub sub: String,
    /// Audience.
    pub aud: String,
    /// Issued at.
    #[serde(default)]
    pub iat: i64,
    /// Expiration time.
    pub exp: i64,
}

/// Issues tokens for authenticated accounts.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token binding requests to `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the token cannot be signed.
    fn issue(&self, account_id: AccountId) -> Result<String, TokenError>;
}

/// Mints and verifies RS256 tokens with a fixed key pair.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    /// Build an authority from PEM-encoded keys.
    ///
    /// The private key may be PKCS#1 or PKCS#8; the public key may be
    /// PKCS#1 or SPKI.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Key` if either key cannot be parsed.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| TokenError::Key(format!("private key: {e}")))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| TokenError::Key(format!("public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_required_spec_claims(&["sub", "aud", "exp"]);

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            ttl,
        })
    }

    /// Build an authority from base64-wrapped PEM keys, as found in the environment.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Key` if either value is not base64 or not a PEM RSA key.
    pub fn from_base64_pem(
        private_key: &str,
        public_key: &str,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let private_pem = STANDARD
            .decode(private_key.trim())
            .map_err(|e| TokenError::Key(format!("private key is not base64: {e}")))?;
        let public_pem = STANDARD
            .decode(public_key.trim())
            .map_err(|e| TokenError::Key(format!("public key is not base64: {e}")))?;

        Self::from_pem(&private_pem, &public_pem, ttl)
    }

    /// Mint a token for `account_id`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if signing fails.
    pub fn mint(&self, account_id: AccountId) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return the account it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidToken` for any verification failure.
    pub fn verify(&self, token: &str) -> Result<AccountId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::InvalidToken
        })?;

        data.claims
            .sub
            .parse()
            .map_err(|_| TokenError::InvalidToken)
    }
}

impl TokenIssuer for TokenAuthority {
    fn issue(&self, account_id: AccountId) -> Result<String, TokenError> {
        self.mint(account_id)
    }
}
