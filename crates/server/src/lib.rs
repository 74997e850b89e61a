//! Paywall Server library.
//!
//! This crate provides the demo checkout server as a library, allowing the
//! router to be exercised in tests without binding a socket.
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates for server-side rendering
//! - Payment provider hosted checkout for the purchase itself
//! - Entitlement provider receipt exchange on return from checkout
//! - Signed cookie sessions for identity and checkout options; no database

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod revenuecat;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Assemble the full application router with its middleware stack.
///
/// Session state travels entirely in a signed cookie, so there is no
/// session layer here. Sentry layers are added by the binary so tests
/// don't need a DSN.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
