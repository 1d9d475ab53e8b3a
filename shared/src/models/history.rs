//! Historical item records and the reconstruction fallback chain
//!
//! Orders persisted over the life of the system carry item data at three
//! levels of fidelity. [`Order::item_records`] picks the richest level that
//! actually has data, and [`reconstruct_pieces`] turns it into a uniform list
//! of [`RecoveredPiece`]s.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::{FabricSource, OrderItem};
use super::order::Order;
use super::piece::PieceCode;
use crate::error::DataIncompleteWarning;
use crate::types::round_money;

/// Fabric text used for fabricated pieces
pub const PLACEHOLDER_FABRIC: &str = "Unspecified fabric";
/// Cut text used for fabricated pieces
pub const PLACEHOLDER_CUT: &str = "Unspecified cut";

/// Names-only record of one piece
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemSummary {
    pub piece_code: PieceCode,
    pub fabric_name: String,
    #[serde(default)]
    pub customer_supplied_fabric: bool,
    pub cut_name: String,
    #[serde(default)]
    pub accessories: Vec<AccessorySummary>,
    #[serde(default)]
    pub labor_names: Vec<String>,
    /// Piece price, when it was recorded
    #[serde(default)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessorySummary {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Item data of an order at the richest fidelity available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRecords<'a> {
    Detailed(&'a [OrderItem]),
    Summary(&'a [ItemSummary]),
    Synthetic { count: u32, order_total: Decimal },
}

impl ItemRecords<'_> {
    pub fn fidelity(&self) -> ItemFidelity {
        match self {
            ItemRecords::Detailed(_) => ItemFidelity::Detailed,
            ItemRecords::Summary(_) => ItemFidelity::Summary,
            ItemRecords::Synthetic { .. } => ItemFidelity::Synthetic,
        }
    }
}

/// Which record level a piece was rebuilt from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemFidelity {
    Detailed,
    Summary,
    Synthetic,
}

impl Order {
    /// First record level that yields a non-empty list
    pub fn item_records(&self) -> ItemRecords<'_> {
        if !self.items.is_empty() {
            ItemRecords::Detailed(&self.items)
        } else if !self.item_summaries.is_empty() {
            ItemRecords::Summary(&self.item_summaries)
        } else {
            ItemRecords::Synthetic {
                count: self.item_count,
                order_total: self.total,
            }
        }
    }
}

/// Fabric of a rebuilt piece. Prices are `None` when history lost them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveredFabric {
    pub fabric_id: Option<Uuid>,
    /// Fabric name, or the customer's specification text
    pub name: String,
    pub customer_supplied: bool,
    pub price_per_unit: Option<Decimal>,
    pub unit: Option<String>,
    pub meters: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveredPart {
    pub id: Option<Uuid>,
    pub name: String,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveredAccessory {
    pub id: Option<Uuid>,
    pub name: String,
    pub unit_price: Option<Decimal>,
    pub quantity: u32,
}

/// One piece of a historical order, normalised across record levels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveredPiece {
    pub piece_code: PieceCode,
    pub fidelity: ItemFidelity,
    pub fabric: RecoveredFabric,
    pub cut: RecoveredPart,
    pub accessories: Vec<RecoveredAccessory>,
    pub labors: Vec<RecoveredPart>,
    /// Piece price as far as history tells (zero when unknown)
    pub total_price: Decimal,
}

/// Pieces of one order plus what was lost rebuilding them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub fidelity: ItemFidelity,
    pub pieces: Vec<RecoveredPiece>,
    pub warnings: Vec<DataIncompleteWarning>,
}

/// Rebuild the pieces of `order` from the richest record level available.
///
/// Detailed records are lossless. Summary records keep names but lose unit
/// prices. Synthetic reconstruction fabricates `item_count` generic pieces
/// sharing the order total evenly and always carries a warning.
pub fn reconstruct_pieces(order: &Order) -> Reconstruction {
    let records = order.item_records();
    let fidelity = records.fidelity();
    let mut warnings = Vec::new();

    let pieces = match records {
        ItemRecords::Detailed(items) => items.iter().map(from_detailed).collect(),
        ItemRecords::Summary(summaries) => summaries.iter().map(from_summary).collect(),
        ItemRecords::Synthetic { count, order_total } => {
            let pieces = synthesize(order.id, count, order_total);
            if count > 0 {
                warnings.push(DataIncompleteWarning::SyntheticItems {
                    order_id: order.id,
                    piece_count: count,
                });
            }
            pieces
        }
    };

    Reconstruction {
        fidelity,
        pieces,
        warnings,
    }
}

fn from_detailed(item: &OrderItem) -> RecoveredPiece {
    let selection = &item.selection;
    let fabric = match &selection.fabric {
        FabricSource::Workshop(fabric) => RecoveredFabric {
            fabric_id: fabric.fabric_id,
            name: fabric.name.clone(),
            customer_supplied: false,
            price_per_unit: Some(fabric.price_per_unit),
            unit: Some(fabric.unit.clone()),
            meters: fabric.meters,
        },
        FabricSource::CustomerSupplied { specification } => RecoveredFabric {
            fabric_id: None,
            name: specification.clone(),
            customer_supplied: true,
            price_per_unit: None,
            unit: None,
            meters: None,
        },
    };

    RecoveredPiece {
        piece_code: item.piece_code.clone(),
        fidelity: ItemFidelity::Detailed,
        fabric,
        cut: RecoveredPart {
            id: selection.cut.cut_id,
            name: selection.cut.name.clone(),
            price: Some(selection.cut.price),
        },
        accessories: selection
            .accessories
            .iter()
            .map(|a| RecoveredAccessory {
                id: a.accessory_id,
                name: a.name.clone(),
                unit_price: Some(a.unit_price),
                quantity: a.quantity,
            })
            .collect(),
        labors: selection
            .labors
            .iter()
            .map(|l| RecoveredPart {
                id: l.labor_id,
                name: l.name.clone(),
                price: Some(l.price),
            })
            .collect(),
        total_price: item.total_price,
    }
}

fn from_summary(summary: &ItemSummary) -> RecoveredPiece {
    RecoveredPiece {
        piece_code: summary.piece_code.clone(),
        fidelity: ItemFidelity::Summary,
        fabric: RecoveredFabric {
            fabric_id: None,
            name: summary.fabric_name.clone(),
            customer_supplied: summary.customer_supplied_fabric,
            price_per_unit: None,
            unit: None,
            meters: None,
        },
        cut: RecoveredPart {
            id: None,
            name: summary.cut_name.clone(),
            price: None,
        },
        accessories: summary
            .accessories
            .iter()
            .map(|a| RecoveredAccessory {
                id: None,
                name: a.name.clone(),
                unit_price: None,
                quantity: a.quantity.max(1),
            })
            .collect(),
        labors: summary
            .labor_names
            .iter()
            .map(|name| RecoveredPart {
                id: None,
                name: name.clone(),
                price: None,
            })
            .collect(),
        total_price: round_money(summary.price.unwrap_or(Decimal::ZERO)),
    }
}

fn synthesize(order_id: Uuid, count: u32, order_total: Decimal) -> Vec<RecoveredPiece> {
    if count == 0 {
        return Vec::new();
    }
    let share = round_money(order_total / Decimal::from(count));

    (0..count as usize)
        .map(|index| RecoveredPiece {
            piece_code: PieceCode::synthetic(order_id, index),
            fidelity: ItemFidelity::Synthetic,
            fabric: RecoveredFabric {
                fabric_id: None,
                name: PLACEHOLDER_FABRIC.to_string(),
                customer_supplied: false,
                price_per_unit: None,
                unit: None,
                meters: None,
            },
            cut: RecoveredPart {
                id: None,
                name: PLACEHOLDER_CUT.to_string(),
                price: None,
            },
            accessories: Vec::new(),
            labors: Vec::new(),
            total_price: share,
        })
        .collect()
}
