//! Order HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::OrderStatus;
use crate::services::order::{CreateOrderInput, FinalizeDraftInput, StatusMetadata};
use crate::services::{OrderScope, OrderService, RepeatOrderBuilder};
use crate::AppState;

fn order_service(state: &AppState) -> OrderService {
    OrderService::new(state.store.clone(), state.config.pieces.code_prefix.clone())
}

/// Query parameters for listing orders
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Restrict to one workshop's orders
    pub workshop: Option<Uuid>,
    /// Read the global collection instead of the workshop one
    #[serde(default)]
    pub global: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusInput {
    pub status: String,
    #[serde(flatten)]
    pub metadata: StatusMetadata,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentInput {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct RepeatOrderInput {
    pub selected_pieces: Vec<String>,
}

/// List orders of a workshop, all workshops, or the global collection
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    let scope = if query.global {
        OrderScope::Global
    } else {
        OrderScope::Workshop(query.workshop)
    };

    match order_service(&state).list_orders(scope) {
        Ok(orders) => (StatusCode::OK, Json(serde_json::json!({ "orders": orders }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Place a new order
pub async fn place_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> impl IntoResponse {
    match order_service(&state).place_order(input) {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific order
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    match order_service(&state).get_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Move an order to the next production status
pub async fn advance_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<AdvanceStatusInput>,
) -> impl IntoResponse {
    let Some(status) = OrderStatus::from_str(&input.status) else {
        return AppError::Validation {
            field: "status".to_string(),
            message: format!("Unknown status '{}'", input.status),
        }
        .into_response();
    };

    match order_service(&state).advance_status(order_id, status, input.metadata) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a payment against an order
pub async fn record_payment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<RecordPaymentInput>,
) -> impl IntoResponse {
    match order_service(&state).record_payment(order_id, input.amount) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Build a repeat-order draft from selected pieces of a past order
pub async fn build_repeat_draft(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<RepeatOrderInput>,
) -> AppResult<impl IntoResponse> {
    let source = order_service(&state).get_order(order_id)?;
    let builder = RepeatOrderBuilder::new(state.config.pieces.code_prefix.clone());
    let draft = builder.build_draft(&source, &input.selected_pieces)?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// Place a completed repeat-order draft
pub async fn finalize_draft(
    State(state): State<AppState>,
    Json(input): Json<FinalizeDraftInput>,
) -> impl IntoResponse {
    match order_service(&state).finalize_draft(input) {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}
