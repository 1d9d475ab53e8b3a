//! Order service: placing orders and moving them through production

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    CustomerRef, Discount, ItemSelection, MeasurementSet, Order, OrderItem, OrderStatus, Payment,
    PaymentMethod, ProductionRecord, WorkshopRef,
};
use crate::services::repeat_order::{DraftOrder, RepeatOrderBuilder};
use crate::services::resolver::PieceResolver;
use crate::services::store::{OrderScope, OrderStore};
use shared::{
    compute_item_total, compute_order_total, remaining_amount, round_money,
    round_selection_prices, validate_cutter_name, validate_delivery_date, validate_payment_amount,
    validate_received_amount, validate_status_transition, OrderItemComposer,
};

/// Order service over an injected order store
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    piece_prefix: String,
}

/// Customer details captured with a new order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerInput {
    /// Existing customer id; a new one is issued when absent
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub name: String,
    pub phone: Option<String>,
}

/// Input for placing an order
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderInput {
    pub workshop: WorkshopRef,
    #[validate]
    pub customer: CustomerInput,
    #[serde(default)]
    pub measurements: Option<MeasurementSet>,
    #[validate(length(min = 1, message = "An order needs at least one piece"))]
    pub items: Vec<ItemSelection>,
    #[serde(default)]
    pub discount: Discount,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub received_amount: Decimal,
}

/// Details the production workflow supplies with a status change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusMetadata {
    pub cutter_name: Option<String>,
}

/// Operator input completing a repeat-order draft
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeDraftInput {
    pub draft: DraftOrder,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub received_amount: Decimal,
    /// Must be set when the source history is incomplete
    #[serde(default)]
    pub acknowledge_incomplete: bool,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, piece_prefix: impl Into<String>) -> Self {
        Self {
            store,
            piece_prefix: piece_prefix.into(),
        }
    }

    /// Compose every piece, price the order and store it
    pub fn place_order(&self, mut input: CreateOrderInput) -> AppResult<Order> {
        input.customer.name = input.customer.name.trim().to_string();
        input.validate()?;

        let today = Utc::now().date_naive();
        if let Some(delivery) = input.delivery_date {
            validate_delivery_date(delivery, today)?;
        }
        validate_received_amount(input.received_amount)?;

        // One composer per order session
        let mut composer = OrderItemComposer::with_prefix(&self.piece_prefix);
        let mut items: Vec<OrderItem> = Vec::with_capacity(input.items.len());
        for selection in input.items {
            composer.load_selection(selection);
            items.push(composer.commit_item()?);
        }

        let customer = CustomerRef {
            id: input.customer.id.unwrap_or_else(Uuid::new_v4),
            name: input.customer.name,
            phone: input.customer.phone,
        };

        let order = self.assemble(
            input.workshop,
            customer,
            input.measurements,
            items,
            input.discount,
            input.delivery_date,
            input.payment_method,
            input.received_amount,
        )?;

        self.store.append_order(order.clone())?;
        tracing::info!(
            order_id = %order.id,
            workshop_id = %order.workshop.id,
            pieces = order.items.len(),
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }

    /// Persist a repeat-order draft once the operator has completed it.
    ///
    /// The submitted draft is re-checked against the store: warnings are
    /// derived again from the source order, item totals are recomputed and
    /// piece codes already printed on another piece are rejected.
    pub fn finalize_draft(&self, input: FinalizeDraftInput) -> AppResult<Order> {
        let FinalizeDraftInput {
            draft,
            delivery_date,
            discount,
            payment_method,
            received_amount,
            acknowledge_incomplete,
        } = input;
        let DraftOrder {
            source_order_id,
            selected_pieces,
            order: draft_order,
            ..
        } = draft;

        let source = self.get_order(source_order_id)?;
        let warnings = RepeatOrderBuilder::new(self.piece_prefix.clone())
            .history_warnings(&source, &selected_pieces)?;
        if !warnings.is_empty() && !acknowledge_incomplete {
            return Err(AppError::Validation {
                field: "acknowledge_incomplete".to_string(),
                message: format!(
                    "Draft has {} incomplete-history warnings that must be acknowledged",
                    warnings.len()
                ),
            });
        }
        if draft_order.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "An order needs at least one piece".to_string(),
            });
        }
        if let Some(delivery) = delivery_date {
            validate_delivery_date(delivery, Utc::now().date_naive())?;
        }
        validate_received_amount(received_amount)?;

        let items = self.verify_draft_items(draft_order.items)?;
        let order = self.assemble(
            source.workshop,
            source.customer,
            draft_order.measurements,
            items,
            discount,
            delivery_date,
            payment_method,
            received_amount,
        )?;

        self.store.append_order(order.clone())?;
        tracing::info!(
            order_id = %order.id,
            source_order_id = %source_order_id,
            warnings = warnings.len(),
            "Repeat order placed"
        );
        Ok(order)
    }

    /// Reprice submitted draft items and make sure every piece code is new
    fn verify_draft_items(&self, items: Vec<OrderItem>) -> AppResult<Vec<OrderItem>> {
        let resolver = PieceResolver::new(self.store.clone());
        let mut seen = HashSet::new();

        items
            .into_iter()
            .enumerate()
            .map(|(i, mut item)| {
                let field = format!("items[{}].piece_code", i);
                let code = item.piece_code.as_str();
                if code.trim().is_empty() || !seen.insert(code.to_string()) {
                    return Err(AppError::Validation {
                        field,
                        message: "Each piece needs its own code".to_string(),
                    });
                }
                match resolver.resolve(code, None) {
                    Ok(existing) => {
                        return Err(AppError::Validation {
                            field,
                            message: format!(
                                "Piece code {} already belongs to order {}",
                                code, existing.context.order_id
                            ),
                        })
                    }
                    Err(AppError::PieceNotFound(_)) => {}
                    Err(e) => return Err(e),
                }

                round_selection_prices(&mut item.selection);
                item.total_price = compute_item_total(&item.selection)?;
                item.id = Uuid::new_v4();
                Ok(item)
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        workshop: WorkshopRef,
        customer: CustomerRef,
        measurements: Option<MeasurementSet>,
        items: Vec<OrderItem>,
        discount: Discount,
        delivery_date: Option<NaiveDate>,
        payment_method: PaymentMethod,
        received_amount: Decimal,
    ) -> AppResult<Order> {
        let totals = compute_order_total(&items, &discount)?;
        let received_amount = round_money(received_amount);
        let payment = Payment {
            method: payment_method,
            received_amount,
            remaining_amount: remaining_amount(totals.total, received_amount),
        };
        warn_if_overpaid(None, &payment);

        Ok(Order {
            id: Uuid::new_v4(),
            workshop,
            customer,
            measurements,
            item_count: items.len() as u32,
            items,
            item_summaries: Vec::new(),
            discount,
            subtotal: totals.subtotal,
            total: totals.total,
            delivery_date,
            payment,
            status: OrderStatus::New,
            production: None,
            completed_at: None,
            created_at: Utc::now(),
        })
    }

    /// Move an order one step forward in production
    pub fn advance_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        metadata: StatusMetadata,
    ) -> AppResult<Order> {
        let mut order = self.get_order(order_id)?;

        validate_status_transition(order.status, new_status)?;

        match new_status {
            OrderStatus::InProduction => {
                let cutter = validate_cutter_name(metadata.cutter_name.as_deref())?;
                order.production = Some(ProductionRecord {
                    cutter_name: cutter.to_string(),
                    started_at: Utc::now(),
                });
            }
            OrderStatus::Completed => order.completed_at = Some(Utc::now()),
            OrderStatus::New => {}
        }

        let previous = order.status;
        order.status = new_status;
        self.store.update_order(order.clone())?;

        tracing::info!(
            order_id = %order.id,
            from = previous.as_str(),
            to = new_status.as_str(),
            "Order status changed"
        );
        Ok(order)
    }

    /// Add a payment to the received amount
    pub fn record_payment(&self, order_id: Uuid, amount: Decimal) -> AppResult<Order> {
        validate_payment_amount(amount)?;
        let mut order = self.get_order(order_id)?;

        let received = order
            .payment
            .received_amount
            .checked_add(amount)
            .map(round_money)
            .ok_or_else(|| AppError::Validation {
                field: "amount".to_string(),
                message: "Payment amount is too large".to_string(),
            })?;
        order.payment.received_amount = received;
        order.payment.remaining_amount = remaining_amount(order.total, received);
        warn_if_overpaid(Some(order.id), &order.payment);

        self.store.update_order(order.clone())?;
        tracing::info!(
            order_id = %order.id,
            amount = %amount,
            remaining = %order.payment.remaining_amount,
            "Payment recorded"
        );
        Ok(order)
    }

    pub fn get_order(&self, order_id: Uuid) -> AppResult<Order> {
        self.store
            .find_order(order_id)?
            .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))
    }

    pub fn list_orders(&self, scope: OrderScope) -> AppResult<Vec<Order>> {
        self.store.list_orders(&scope)
    }
}

fn warn_if_overpaid(order_id: Option<Uuid>, payment: &Payment) {
    if payment.is_overpaid() {
        tracing::warn!(
            order_id = ?order_id,
            received = %payment.received_amount,
            remaining = %payment.remaining_amount,
            "Order is over-paid"
        );
    }
}
