//! Common types used across the platform

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Currency subunit precision (3-decimal currency)
pub const MONEY_SCALE: u32 = 3;

/// Round a monetary amount to the currency subunit, half away from zero.
/// The result always carries exactly three decimal places.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Render a price for display, e.g. `0.000` or `45.250`
pub fn format_price(value: Decimal) -> String {
    format!("{:.3}", round_money(value))
}

/// Parse a user-supplied numeric string, naming the field on failure
pub fn parse_decimal(field: &str, raw: &str) -> EngineResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| EngineError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Reference to the workshop that owns an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkshopRef {
    pub id: Uuid,
    pub name: String,
}

/// Customer lookup key plus the contact fields copied onto the order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
}
