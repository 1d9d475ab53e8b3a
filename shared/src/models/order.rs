//! Order models: discount, payment, status and the order record itself

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::ItemSummary;
use super::item::OrderItem;
use super::measurement::MeasurementSet;
use crate::types::{CustomerRef, WorkshopRef};

/// How a discount value is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Fixed amount off the subtotal
    #[default]
    Amount,
    /// Percentage of the subtotal
    Percentage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl Discount {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn amount(value: Decimal) -> Self {
        Self {
            kind: DiscountKind::Amount,
            value,
        }
    }

    pub fn percentage(value: Decimal) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Electronic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Payment {
    pub method: PaymentMethod,
    pub received_amount: Decimal,
    /// Order total minus received amount; negative when over-paid
    pub remaining_amount: Decimal,
}

impl Payment {
    pub fn is_overpaid(&self) -> bool {
        self.remaining_amount < Decimal::ZERO
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_amount <= Decimal::ZERO
    }
}

/// Production status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    InProduction,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(OrderStatus::New),
            "in_production" => Some(OrderStatus::InProduction),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    /// Status only moves forward, one step at a time
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::New, OrderStatus::InProduction)
                | (OrderStatus::InProduction, OrderStatus::Completed)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::New => write!(f, "New"),
            OrderStatus::InProduction => write!(f, "In Production"),
            OrderStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Recorded when an order enters production
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionRecord {
    pub cutter_name: String,
    pub started_at: DateTime<Utc>,
}

/// A customer order.
///
/// Orders placed through the engine always carry `items`. Older records may
/// only carry `item_summaries`, or nothing but `item_count` and `total`; see
/// [`Order::item_records`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub workshop: WorkshopRef,
    pub customer: CustomerRef,
    #[serde(default)]
    pub measurements: Option<MeasurementSet>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub item_summaries: Vec<ItemSummary>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub discount: Discount,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub production: Option<ProductionRecord>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values() {
        assert_eq!(OrderStatus::New.as_str(), "new");
        assert_eq!(OrderStatus::InProduction.as_str(), "in_production");
        assert_eq!(OrderStatus::Completed.as_str(), "completed");
        assert_eq!(OrderStatus::from_str("in_production"), Some(OrderStatus::InProduction));
        assert_eq!(OrderStatus::from_str("cancelled"), None);
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::InProduction));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Completed));

        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::New));
        assert!(!OrderStatus::InProduction.can_transition_to(OrderStatus::InProduction));
    }

    #[test]
    fn test_payment_flags() {
        let overpaid = Payment {
            method: PaymentMethod::Cash,
            received_amount: Decimal::from(50),
            remaining_amount: Decimal::from(-5),
        };
        assert!(overpaid.is_overpaid());
        assert!(overpaid.is_settled());

        let open = Payment {
            remaining_amount: Decimal::from(10),
            ..overpaid
        };
        assert!(!open.is_overpaid());
        assert!(!open.is_settled());
    }
}
