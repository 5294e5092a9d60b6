//! Merch shop HTTP API service.
//!
//! This crate provides the HTTP API of the merch shop:
//!
//! - Login with on-the-fly account provisioning
//! - Coin transfers between employees
//! - Merch purchases
//! - Balance, inventory and coin history
//!
//! # Authentication
//!
//! `POST /api/auth` returns an RS256 JWT. Every other `/api` route expects it
//! as `Authorization: Bearer <token>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Fallback handlers need async for Handler

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod shop;
pub mod state;
pub mod token;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use shop::Shop;
pub use state::AppState;
pub use token::{TokenAuthority, TokenError, TokenIssuer, TOKEN_AUDIENCE};
