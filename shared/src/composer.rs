//! Order item composer
//!
//! Collects the operator's selections for one piece and turns them into an
//! immutable [`OrderItem`]. Each composition session owns its own composer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AccessoryOption, AccessorySelection, CutOption, CutSelection, FabricOption, FabricSource,
    FabricSourceKind, ItemSelection, LaborOption, LaborSelection, OrderItem, PieceCode,
    WorkshopFabric, DEFAULT_PIECE_PREFIX,
};
use crate::pricing::{compute_item_total, round_selection_prices};

/// Observable composer state, derived from what has been chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComposerState {
    Empty,
    FabricChosen,
    CutChosen,
    /// Fabric and cut are both set; the item can be committed
    Ready,
}

/// In-progress selection for a single piece
#[derive(Debug, Clone)]
pub struct OrderItemComposer {
    piece_prefix: String,
    fabric: Option<FabricSource>,
    cut: Option<CutSelection>,
    accessories: Vec<AccessorySelection>,
    labors: Vec<LaborSelection>,
}

impl Default for OrderItemComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderItemComposer {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PIECE_PREFIX)
    }

    /// Composer issuing piece codes with a workshop-specific prefix
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            piece_prefix: prefix.to_string(),
            fabric: None,
            cut: None,
            accessories: Vec::new(),
            labors: Vec::new(),
        }
    }

    pub fn state(&self) -> ComposerState {
        match (&self.fabric, &self.cut) {
            (None, None) => ComposerState::Empty,
            (Some(_), None) => ComposerState::FabricChosen,
            (None, Some(_)) => ComposerState::CutChosen,
            (Some(_), Some(_)) => ComposerState::Ready,
        }
    }

    pub fn can_commit(&self) -> bool {
        self.state() == ComposerState::Ready
    }

    pub fn fabric(&self) -> Option<&FabricSource> {
        self.fabric.as_ref()
    }

    pub fn cut(&self) -> Option<&CutSelection> {
        self.cut.as_ref()
    }

    pub fn accessories(&self) -> &[AccessorySelection] {
        &self.accessories
    }

    pub fn labors(&self) -> &[LaborSelection] {
        &self.labors
    }

    // ------------------------------------------------------------------------
    // Fabric
    // ------------------------------------------------------------------------

    /// Switch between workshop and customer-supplied fabric.
    ///
    /// Changing the variant drops whatever fabric was selected before,
    /// including a workshop fabric and its meters. Switching back does not
    /// restore it.
    pub fn switch_fabric_source(&mut self, kind: FabricSourceKind) {
        if self.fabric.as_ref().map(FabricSource::kind) == Some(kind) {
            return;
        }
        self.fabric = match kind {
            FabricSourceKind::Workshop => None,
            FabricSourceKind::CustomerSupplied => Some(FabricSource::CustomerSupplied {
                specification: String::new(),
            }),
        };
    }

    pub fn choose_workshop_fabric(&mut self, fabric: &FabricOption, meters: Option<Decimal>) {
        let mut selected = WorkshopFabric::from(fabric);
        selected.meters = meters;
        self.fabric = Some(FabricSource::Workshop(selected));
    }

    /// Update meters of the selected workshop fabric
    pub fn set_meters(&mut self, meters: Option<Decimal>) -> EngineResult<()> {
        match &mut self.fabric {
            Some(FabricSource::Workshop(fabric)) => {
                fabric.meters = meters;
                Ok(())
            }
            _ => Err(EngineError::validation(
                "fabric.meters",
                "Meters apply to workshop fabric only",
            )),
        }
    }

    /// Select customer-supplied fabric with the given description
    pub fn describe_customer_fabric(&mut self, specification: &str) {
        self.fabric = Some(FabricSource::CustomerSupplied {
            specification: specification.trim().to_string(),
        });
    }

    // ------------------------------------------------------------------------
    // Cut
    // ------------------------------------------------------------------------

    pub fn choose_cut(&mut self, cut: &CutOption) {
        self.cut = Some(CutSelection::from(cut));
    }

    // ------------------------------------------------------------------------
    // Accessories and labor
    // ------------------------------------------------------------------------

    /// Add an accessory, or bump its quantity when already selected
    pub fn toggle_accessory(&mut self, accessory: &AccessoryOption) {
        match self
            .accessories
            .iter_mut()
            .find(|a| a.matches(Some(accessory.id), &accessory.name))
        {
            Some(existing) => existing.quantity += 1,
            None => self.accessories.push(AccessorySelection {
                accessory_id: Some(accessory.id),
                name: accessory.name.clone(),
                unit_price: accessory.unit_price,
                quantity: 1,
            }),
        }
    }

    /// Decrement an accessory's quantity, removing it at quantity 1.
    /// Returns false when the accessory was not selected.
    pub fn deselect_accessory(&mut self, accessory_id: Uuid) -> bool {
        let Some(index) = self
            .accessories
            .iter()
            .position(|a| a.accessory_id == Some(accessory_id))
        else {
            return false;
        };

        if self.accessories[index].quantity > 1 {
            self.accessories[index].quantity -= 1;
        } else {
            self.accessories.remove(index);
        }
        true
    }

    /// Add a labor, or remove it when already selected
    pub fn toggle_labor(&mut self, labor: &LaborOption) {
        match self
            .labors
            .iter()
            .position(|l| l.labor_id == Some(labor.id))
        {
            Some(index) => {
                self.labors.remove(index);
            }
            None => self.labors.push(LaborSelection::from(labor)),
        }
    }

    /// Replace the whole selection with one prepared elsewhere, e.g. a
    /// submitted order form or a rebuilt historical piece
    pub fn load_selection(&mut self, selection: ItemSelection) {
        self.fabric = Some(selection.fabric);
        self.cut = Some(selection.cut);
        self.accessories = selection.accessories;
        self.labors = selection.labors;
    }

    // ------------------------------------------------------------------------
    // Commit
    // ------------------------------------------------------------------------

    fn ready_selection(&self) -> EngineResult<ItemSelection> {
        let fabric = self
            .fabric
            .clone()
            .ok_or_else(|| EngineError::validation("fabric", "Select a fabric before adding the piece"))?;
        let cut = self
            .cut
            .clone()
            .ok_or_else(|| EngineError::validation("cut", "Select a cut before adding the piece"))?;

        Ok(ItemSelection {
            fabric,
            cut,
            accessories: self.accessories.clone(),
            labors: self.labors.clone(),
        })
    }

    /// Running total of the current selection
    pub fn preview_total(&self) -> EngineResult<Decimal> {
        let mut selection = self.ready_selection()?;
        round_selection_prices(&mut selection);
        compute_item_total(&selection)
    }

    /// Snapshot the selection into an [`OrderItem`] with a fresh piece code
    /// and reset to empty. Fails without touching the selection unless both
    /// fabric and cut are set.
    pub fn commit_item(&mut self) -> EngineResult<OrderItem> {
        let mut selection = self.ready_selection()?;
        round_selection_prices(&mut selection);
        let total_price = compute_item_total(&selection)?;

        let item = OrderItem {
            id: Uuid::new_v4(),
            piece_code: PieceCode::generate_with_prefix(&self.piece_prefix),
            selection,
            total_price,
        };

        self.reset();
        Ok(item)
    }

    /// Discard the current selection
    pub fn reset(&mut self) {
        self.fabric = None;
        self.cut = None;
        self.accessories.clear();
        self.labors.clear();
    }
}
