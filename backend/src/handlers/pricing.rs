//! Pricing handlers used by the order form while composing

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{Discount, ItemSelection};
use shared::{compute_item_total, compute_selection_totals, format_price, OrderTotals};

#[derive(Debug, Serialize)]
pub struct ItemPriceResponse {
    pub total_price: Decimal,
    pub formatted: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceOrderInput {
    pub items: Vec<ItemSelection>,
    #[serde(default)]
    pub discount: Discount,
}

#[derive(Debug, Serialize)]
pub struct OrderPriceResponse {
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub formatted_total: String,
}

/// Price a single piece
pub async fn price_item(Json(selection): Json<ItemSelection>) -> AppResult<Json<ItemPriceResponse>> {
    let total_price = compute_item_total(&selection)?;
    Ok(Json(ItemPriceResponse {
        formatted: format_price(total_price),
        total_price,
    }))
}

/// Price a whole order with its discount
pub async fn price_order(Json(input): Json<PriceOrderInput>) -> AppResult<Json<OrderPriceResponse>> {
    let selections: Vec<&ItemSelection> = input.items.iter().collect();
    let totals = compute_selection_totals(&selections, &input.discount)?;
    Ok(Json(OrderPriceResponse {
        formatted_total: format_price(totals.total),
        totals,
    }))
}
