//! Validation utilities for the Tailoring Orders Platform

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::OrderStatus;

// ============================================================================
// Order Validations
// ============================================================================

/// Delivery cannot be scheduled before the order was taken
pub fn validate_delivery_date(delivery: NaiveDate, ordered_on: NaiveDate) -> EngineResult<()> {
    if delivery < ordered_on {
        return Err(EngineError::validation(
            "delivery_date",
            "Delivery date cannot be before the order date",
        ));
    }
    Ok(())
}

/// Payments are recorded one positive amount at a time
pub fn validate_payment_amount(amount: Decimal) -> EngineResult<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::validation(
            "amount",
            "Payment amount must be greater than zero",
        ));
    }
    Ok(())
}

/// Received amount at order time may be zero but never negative
pub fn validate_received_amount(amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::validation(
            "payment.received_amount",
            "Received amount cannot be negative",
        ));
    }
    Ok(())
}

/// Starting production requires the name of the cutter
pub fn validate_cutter_name(name: Option<&str>) -> EngineResult<&str> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(EngineError::validation(
            "cutter_name",
            "Cutter name is required to start production",
        )),
    }
}

/// Orders move New -> InProduction -> Completed, one step at a time
pub fn validate_status_transition(from: OrderStatus, to: OrderStatus) -> EngineResult<()> {
    if !from.can_transition_to(to) {
        return Err(EngineError::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Repeat Order Validations
// ============================================================================

/// A repeat order needs at least one piece, each selected once
pub fn validate_piece_selection(selected: &[String]) -> EngineResult<()> {
    if selected.is_empty() {
        return Err(EngineError::validation(
            "selected_pieces",
            "Select at least one piece to repeat",
        ));
    }
    let mut seen = HashSet::new();
    for code in selected {
        if !seen.insert(code.as_str()) {
            return Err(EngineError::validation(
                "selected_pieces",
                format!("Piece {} is selected more than once", code),
            ));
        }
    }
    Ok(())
}
