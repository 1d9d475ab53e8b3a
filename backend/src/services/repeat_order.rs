//! Repeat orders: a new draft built from pieces of a past order

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    reconstruct_pieces, AccessorySelection, CutSelection, Discount, FabricSource, ItemSelection,
    LaborSelection, Order, OrderItem, OrderStatus, Payment, PieceCode, RecoveredPiece,
    WorkshopFabric,
};
use shared::{
    compute_order_total, validate_piece_selection, DataIncompleteWarning, OrderItemComposer,
};

/// Unit used when history does not say how a fabric was sold
const DEFAULT_FABRIC_UNIT: &str = "meter";

/// Builds repeat-order drafts, issuing codes with the configured prefix
#[derive(Debug, Clone)]
pub struct RepeatOrderBuilder {
    piece_prefix: String,
}

/// A draft awaiting operator finalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrder {
    pub source_order_id: Uuid,
    /// Codes of the source pieces the draft was built from
    pub selected_pieces: Vec<String>,
    pub order: Order,
    /// Non-empty drafts must be acknowledged before they are placed
    #[serde(default)]
    pub warnings: Vec<DataIncompleteWarning>,
}

impl DraftOrder {
    pub fn is_incomplete(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl RepeatOrderBuilder {
    pub fn new(piece_prefix: impl Into<String>) -> Self {
        Self {
            piece_prefix: piece_prefix.into(),
        }
    }

    /// Draft a new order for the same customer from the selected pieces of
    /// `source`.
    ///
    /// Every piece gets a fresh code. Prices the history lost are set to
    /// zero and reported as warnings.
    pub fn build_draft(&self, source: &Order, selected_pieces: &[String]) -> AppResult<DraftOrder> {
        let (items, warnings) = self.rebuild_selected(source, selected_pieces)?;

        let unrecovered = warnings
            .iter()
            .filter(|w| matches!(w, DataIncompleteWarning::UnrecoveredPrice { .. }))
            .count();
        if unrecovered > 0 {
            tracing::warn!(
                source_order_id = %source.id,
                unrecovered,
                "Repeat draft carries zero prices for unrecovered history"
            );
        }

        let discount = Discount::none();
        let totals = compute_order_total(&items, &discount)?;
        let order = Order {
            id: Uuid::new_v4(),
            workshop: source.workshop.clone(),
            customer: source.customer.clone(),
            measurements: source.measurements.clone(),
            item_count: items.len() as u32,
            items,
            item_summaries: Vec::new(),
            discount,
            subtotal: totals.subtotal,
            total: totals.total,
            delivery_date: None,
            payment: Payment {
                method: source.payment.method,
                received_amount: Decimal::ZERO,
                remaining_amount: totals.total,
            },
            status: OrderStatus::New,
            production: None,
            completed_at: None,
            created_at: Utc::now(),
        };

        tracing::info!(
            source_order_id = %source.id,
            draft_id = %order.id,
            pieces = order.items.len(),
            "Repeat draft built"
        );

        Ok(DraftOrder {
            source_order_id: source.id,
            selected_pieces: selected_pieces.to_vec(),
            order,
            warnings,
        })
    }

    /// Warnings a draft of `selected_pieces` from `source` must carry,
    /// derived from the stored history rather than from a submitted draft
    pub fn history_warnings(
        &self,
        source: &Order,
        selected_pieces: &[String],
    ) -> AppResult<Vec<DataIncompleteWarning>> {
        let (_, warnings) = self.rebuild_selected(source, selected_pieces)?;
        Ok(warnings)
    }

    fn rebuild_selected(
        &self,
        source: &Order,
        selected_pieces: &[String],
    ) -> AppResult<(Vec<OrderItem>, Vec<DataIncompleteWarning>)> {
        validate_piece_selection(selected_pieces)?;

        let rebuilt = reconstruct_pieces(source);
        let original_codes: HashSet<&str> =
            rebuilt.pieces.iter().map(|p| p.piece_code.as_str()).collect();

        if let Some(unknown) = selected_pieces
            .iter()
            .find(|code| !original_codes.contains(code.as_str()))
        {
            return Err(AppError::Validation {
                field: "selected_pieces".to_string(),
                message: format!("Piece {} does not belong to order {}", unknown, source.id),
            });
        }

        let mut warnings = rebuilt.warnings.clone();
        let mut composer = OrderItemComposer::with_prefix(&self.piece_prefix);
        let mut items = Vec::with_capacity(selected_pieces.len());

        for piece in rebuilt
            .pieces
            .iter()
            .filter(|p| selected_pieces.iter().any(|code| code == p.piece_code.as_str()))
        {
            let (selection, missing) = rewrap(piece);
            composer.load_selection(selection);
            let mut item = composer.commit_item()?;

            while original_codes.contains(item.piece_code.as_str()) {
                item.piece_code = PieceCode::generate_with_prefix(&self.piece_prefix);
            }

            warnings.extend(missing.into_iter().map(|field| {
                DataIncompleteWarning::UnrecoveredPrice {
                    piece_code: item.piece_code.to_string(),
                    field,
                }
            }));
            items.push(item);
        }

        Ok((items, warnings))
    }
}

/// Put a rebuilt piece back into selection shape. Returns the selection and
/// the fields whose price had to be zeroed.
fn rewrap(piece: &RecoveredPiece) -> (ItemSelection, Vec<String>) {
    let mut missing = Vec::new();
    let mut price_or_zero = |price: Option<Decimal>, field: String| {
        price.unwrap_or_else(|| {
            missing.push(field);
            Decimal::ZERO
        })
    };

    let fabric = if piece.fabric.customer_supplied {
        FabricSource::CustomerSupplied {
            specification: piece.fabric.name.clone(),
        }
    } else {
        FabricSource::Workshop(WorkshopFabric {
            fabric_id: piece.fabric.fabric_id,
            name: piece.fabric.name.clone(),
            price_per_unit: price_or_zero(
                piece.fabric.price_per_unit,
                "fabric.price_per_unit".to_string(),
            ),
            unit: piece
                .fabric
                .unit
                .clone()
                .unwrap_or_else(|| DEFAULT_FABRIC_UNIT.to_string()),
            meters: piece.fabric.meters,
        })
    };

    let cut = CutSelection {
        cut_id: piece.cut.id,
        name: piece.cut.name.clone(),
        price: price_or_zero(piece.cut.price, "cut.price".to_string()),
    };

    let accessories = piece
        .accessories
        .iter()
        .enumerate()
        .map(|(i, a)| AccessorySelection {
            accessory_id: a.id,
            name: a.name.clone(),
            unit_price: price_or_zero(a.unit_price, format!("accessories[{}].unit_price", i)),
            quantity: a.quantity.max(1),
        })
        .collect();

    let labors = piece
        .labors
        .iter()
        .enumerate()
        .map(|(i, l)| LaborSelection {
            labor_id: l.id,
            name: l.name.clone(),
            price: price_or_zero(l.price, format!("labors[{}].price", i)),
        })
        .collect();

    (
        ItemSelection {
            fabric,
            cut,
            accessories,
            labors,
        },
        missing,
    )
}
