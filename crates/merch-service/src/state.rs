//! Application state.

use std::sync::Arc;

use merch_store::Store;

use crate::config::ServiceConfig;
use crate::shop::Shop;
use crate::token::TokenAuthority;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Business operations.
    pub shop: Shop,

    /// The storage backend, for health checks.
    pub store: Arc<dyn Store>,

    /// Token verification for protected routes.
    pub tokens: Arc<TokenAuthority>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenAuthority>, config: ServiceConfig) -> Self {
        let shop = Shop::new(Arc::clone(&store), tokens.clone());

        Self {
            shop,
            store,
            tokens,
            config,
        }
    }
}
