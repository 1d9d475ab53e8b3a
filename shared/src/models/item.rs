//! Order item models: catalog options, selections and committed items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::piece::PieceCode;

// ============================================================================
// Catalog options (what the operator picks from)
// ============================================================================

/// Fabric sold by the workshop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FabricOption {
    pub id: Uuid,
    pub name: String,
    pub price_per_unit: Decimal,
    /// Selling unit, e.g. "meter"
    pub unit: String,
}

/// Garment cut / model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CutOption {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessoryOption {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaborOption {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

// ============================================================================
// Selections (what ends up on an item)
// ============================================================================

/// Where the fabric of a piece comes from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FabricSource {
    Workshop(WorkshopFabric),
    CustomerSupplied {
        #[serde(default)]
        specification: String,
    },
}

impl FabricSource {
    pub fn kind(&self) -> FabricSourceKind {
        match self {
            FabricSource::Workshop(_) => FabricSourceKind::Workshop,
            FabricSource::CustomerSupplied { .. } => FabricSourceKind::CustomerSupplied,
        }
    }

    /// Human-readable description for labels and lookups
    pub fn describe(&self) -> String {
        match self {
            FabricSource::Workshop(fabric) => fabric.name.clone(),
            FabricSource::CustomerSupplied { specification } if specification.is_empty() => {
                "Customer fabric".to_string()
            }
            FabricSource::CustomerSupplied { specification } => {
                format!("Customer fabric: {}", specification)
            }
        }
    }
}

/// Fabric source variant without its payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FabricSourceKind {
    Workshop,
    CustomerSupplied,
}

/// Workshop fabric as used on one piece
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkshopFabric {
    /// None when rebuilt from a names-only history
    pub fabric_id: Option<Uuid>,
    pub name: String,
    pub price_per_unit: Decimal,
    pub unit: String,
    /// Defaults to one unit when absent
    pub meters: Option<Decimal>,
}

impl From<&FabricOption> for WorkshopFabric {
    fn from(option: &FabricOption) -> Self {
        Self {
            fabric_id: Some(option.id),
            name: option.name.clone(),
            price_per_unit: option.price_per_unit,
            unit: option.unit.clone(),
            meters: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CutSelection {
    pub cut_id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
}

impl From<&CutOption> for CutSelection {
    fn from(option: &CutOption) -> Self {
        Self {
            cut_id: Some(option.id),
            name: option.name.clone(),
            price: option.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessorySelection {
    pub accessory_id: Option<Uuid>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl AccessorySelection {
    /// Identity used when toggling: catalog id, falling back to the name
    pub fn matches(&self, accessory_id: Option<Uuid>, name: &str) -> bool {
        match (self.accessory_id, accessory_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaborSelection {
    pub labor_id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
}

impl From<&LaborOption> for LaborSelection {
    fn from(option: &LaborOption) -> Self {
        Self {
            labor_id: Some(option.id),
            name: option.name.clone(),
            price: option.price,
        }
    }
}

/// A complete selection for one piece: fabric and cut are both set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemSelection {
    pub fabric: FabricSource,
    pub cut: CutSelection,
    #[serde(default)]
    pub accessories: Vec<AccessorySelection>,
    #[serde(default)]
    pub labors: Vec<LaborSelection>,
}

/// A committed, priced piece of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub piece_code: PieceCode,
    #[serde(flatten)]
    pub selection: ItemSelection,
    pub total_price: Decimal,
}
