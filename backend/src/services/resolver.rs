//! Piece resolver: piece code to full order context
//!
//! A printed piece code is looked up first among the workshop orders, then in
//! the global collection. Each order's pieces are rebuilt from the richest
//! record level it has, so old orders still answer.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    reconstruct_pieces, CustomerRef, ItemFidelity, MeasurementSet, Order, OrderStatus,
    ProductionRecord, RecoveredPiece, WorkshopRef,
};
use crate::services::store::{OrderScope, OrderStore};
use shared::DataIncompleteWarning;

/// Resolver over an injected order store
#[derive(Clone)]
pub struct PieceResolver {
    store: Arc<dyn OrderStore>,
}

/// A resolved piece merged with its owning order's details.
///
/// Assembled per lookup and never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PieceContext {
    pub piece: RecoveredPiece,
    pub order_id: Uuid,
    pub workshop: WorkshopRef,
    pub customer: CustomerRef,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub production: Option<ProductionRecord>,
    pub measurements: Option<MeasurementSet>,
    pub order_total: Decimal,
    pub ordered_at: DateTime<Utc>,
}

/// Lookup result: the context plus whatever history could not supply
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPiece {
    #[serde(flatten)]
    pub context: PieceContext,
    pub warnings: Vec<DataIncompleteWarning>,
    /// Collection the piece was found in
    pub found_in: &'static str,
}

impl PieceResolver {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Find the piece with exactly this code.
    ///
    /// `workshop_hint` narrows the workshop search; the global collection is
    /// always searched afterwards.
    pub fn resolve(&self, piece_code: &str, workshop_hint: Option<Uuid>) -> AppResult<ResolvedPiece> {
        if piece_code.trim().is_empty() {
            return Err(AppError::Validation {
                field: "piece_code".to_string(),
                message: "Piece code is required".to_string(),
            });
        }

        for scope in [OrderScope::Workshop(workshop_hint), OrderScope::Global] {
            let orders = self.store.list_orders(&scope)?;
            if let Some(resolved) = find_in_orders(&orders, piece_code, scope) {
                tracing::info!(
                    piece_code,
                    order_id = %resolved.context.order_id,
                    scope = scope.as_str(),
                    "Piece resolved"
                );
                return Ok(resolved);
            }
            tracing::debug!(
                piece_code,
                scope = scope.as_str(),
                orders = orders.len(),
                "Piece not in scope"
            );
        }

        Err(AppError::PieceNotFound(piece_code.to_string()))
    }
}

fn find_in_orders(orders: &[Order], piece_code: &str, scope: OrderScope) -> Option<ResolvedPiece> {
    orders.iter().find_map(|order| {
        let rebuilt = reconstruct_pieces(order);
        let piece = rebuilt
            .pieces
            .into_iter()
            .find(|piece| piece.piece_code.as_str() == piece_code)?;

        let mut warnings = rebuilt.warnings;
        match piece.fidelity {
            ItemFidelity::Detailed => {}
            ItemFidelity::Summary => warnings.push(DataIncompleteWarning::SummaryOnly {
                piece_code: piece_code.to_string(),
            }),
            ItemFidelity::Synthetic => tracing::warn!(
                piece_code,
                order_id = %order.id,
                "Piece resolved from a synthetic reconstruction"
            ),
        }

        Some(ResolvedPiece {
            context: piece_context(order, piece),
            warnings,
            found_in: scope.as_str(),
        })
    })
}

fn piece_context(order: &Order, piece: RecoveredPiece) -> PieceContext {
    PieceContext {
        piece,
        order_id: order.id,
        workshop: order.workshop.clone(),
        customer: order.customer.clone(),
        delivery_date: order.delivery_date,
        status: order.status,
        production: order.production.clone(),
        measurements: order.measurements.clone(),
        order_total: order.total,
        ordered_at: order.created_at,
    }
}
