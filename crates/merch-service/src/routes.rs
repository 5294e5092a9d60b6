//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, auth, coins, health, info, merch};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /api/auth` - Log in (registers unknown usernames)
///
/// ## Bearer token auth
/// - `GET /api/info` - Balance, inventory and coin history
/// - `POST /api/sendCoin` - Send coins to another employee
/// - `GET /api/buy/:item` - Buy one unit of a merch item
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route(
            "/health",
            get(health::health).fallback(handlers::method_not_allowed),
        )
        // Auth (public)
        .route(
            "/api/auth",
            post(auth::login).fallback(handlers::method_not_allowed),
        )
        // Shop
        .route(
            "/api/info",
            get(info::get_info).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/sendCoin",
            post(coins::send_coin).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/buy/:item",
            get(merch::buy_merch).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::route_not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .layer(middleware::map_response(handlers::timeout_envelope))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
