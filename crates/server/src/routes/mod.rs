//! HTTP route handlers for the paywall server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Checkout page (price list)
//! GET  /health                  - Health check
//!
//! # Configuration
//! GET  /configure               - Identity and checkout options form
//! POST /configure               - Apply configuration, redirect home
//!
//! # Checkout
//! POST /create-checkout-session - Create hosted checkout, redirect to it
//! GET  /success?session_id=     - Return from hosted checkout
//! GET  /cancel                  - Hosted checkout was abandoned
//! ```
//!
//! Every page response carries a short-lived stale-while-revalidate cache
//! directive so CDN-fronted deployments can serve bursts without hammering
//! the vendor APIs.

pub mod checkout;
pub mod configure;
pub mod home;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

/// Cache directive applied to every page response.
const CACHE_CONTROL_VALUE: &str = "s-max-age=1, stale-while-revalidate";

/// Create all routes for the paywall server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Checkout page
        .route("/", get(home::checkout_page))
        // Configuration
        .route(
            "/configure",
            get(configure::configure_page).post(configure::configure),
        )
        // Checkout flow
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/success", get(checkout::success))
        .route("/cancel", get(checkout::cancel))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VALUE),
        ))
}
