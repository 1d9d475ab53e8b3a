//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::{OrderScope, OrderStore};
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check the order store answers
    let store_status = match state.store.list_orders(&OrderScope::Global) {
        Ok(orders) => format!("available ({} orders)", orders.len()),
        Err(_) => "unavailable".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status,
    })
}
