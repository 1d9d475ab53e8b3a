//! Route definitions for the Tailoring Orders Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Piece lookup (the address printed on piece labels)
        .route("/piece/:code", get(handlers::resolve_piece))
        // Stateless computations used by the order form
        .route("/measurements/convert", post(handlers::convert_measurements))
        .nest("/pricing", pricing_routes())
        // Order management
        .nest("/orders", order_routes())
}

/// Pricing routes
fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/item", post(handlers::price_item))
        .route("/order", post(handlers::price_order))
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::place_order))
        .route("/drafts", post(handlers::finalize_draft))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", post(handlers::advance_status))
        .route("/:order_id/payments", post(handlers::record_payment))
        .route("/:order_id/repeat", post(handlers::build_repeat_draft))
}
