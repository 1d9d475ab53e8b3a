//! Pricing calculator
//!
//! All amounts are rounded to the 3-decimal currency subunit. Inputs are
//! checked before anything is summed; the error names the offending field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Discount, DiscountKind, FabricSource, ItemSelection, OrderItem};
use crate::types::round_money;

/// Breakdown of an order total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

fn ensure_not_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::validation(field, "Value cannot be negative"));
    }
    Ok(())
}

/// Result of checked arithmetic, or a validation error on `field` when the
/// amount no longer fits a decimal
fn fits(field: &str, value: Option<Decimal>) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::validation(field, "Amount is too large"))
}

/// Round every price of a selection to the currency subunit so stored
/// selections read the same as the totals derived from them
pub fn round_selection_prices(selection: &mut ItemSelection) {
    if let FabricSource::Workshop(fabric) = &mut selection.fabric {
        fabric.price_per_unit = round_money(fabric.price_per_unit);
    }
    selection.cut.price = round_money(selection.cut.price);
    for accessory in &mut selection.accessories {
        accessory.unit_price = round_money(accessory.unit_price);
    }
    for labor in &mut selection.labors {
        labor.price = round_money(labor.price);
    }
}

/// Fabric cost of a piece: price per unit × meters (default 1), zero for
/// customer-supplied fabric
pub fn fabric_cost(fabric: &FabricSource) -> EngineResult<Decimal> {
    match fabric {
        FabricSource::Workshop(fabric) => {
            ensure_not_negative("fabric.price_per_unit", fabric.price_per_unit)?;
            let meters = fabric.meters.unwrap_or(Decimal::ONE);
            if meters <= Decimal::ZERO {
                return Err(EngineError::validation(
                    "fabric.meters",
                    "Meters must be greater than zero",
                ));
            }
            fits(
                "fabric.price_per_unit",
                fabric.price_per_unit.checked_mul(meters),
            )
        }
        FabricSource::CustomerSupplied { .. } => Ok(Decimal::ZERO),
    }
}

/// Total price of one piece:
/// fabric cost + cut price + Σ(accessory unit price × quantity) + Σ(labor price)
pub fn compute_item_total(selection: &ItemSelection) -> EngineResult<Decimal> {
    let mut total = fabric_cost(&selection.fabric)?;

    ensure_not_negative("cut.price", selection.cut.price)?;
    total = fits("cut.price", total.checked_add(selection.cut.price))?;

    for (i, accessory) in selection.accessories.iter().enumerate() {
        ensure_not_negative(&format!("accessories[{}].unit_price", i), accessory.unit_price)?;
        if accessory.quantity == 0 {
            return Err(EngineError::validation(
                format!("accessories[{}].quantity", i),
                "Quantity must be at least 1",
            ));
        }
        let line = accessory
            .unit_price
            .checked_mul(Decimal::from(accessory.quantity))
            .and_then(|line| total.checked_add(line));
        total = fits(&format!("accessories[{}].unit_price", i), line)?;
    }

    for (i, labor) in selection.labors.iter().enumerate() {
        ensure_not_negative(&format!("labors[{}].price", i), labor.price)?;
        total = fits(&format!("labors[{}].price", i), total.checked_add(labor.price))?;
    }

    Ok(round_money(total))
}

/// Discount amount for a given subtotal. Negative discounts are rejected.
pub fn discount_amount(subtotal: Decimal, discount: &Discount) -> EngineResult<Decimal> {
    if discount.value < Decimal::ZERO {
        return Err(EngineError::validation(
            "discount.value",
            "Discount cannot be negative",
        ));
    }
    let amount = match discount.kind {
        DiscountKind::Amount => discount.value,
        DiscountKind::Percentage => {
            fits("discount.value", subtotal.checked_mul(discount.value))? / Decimal::ONE_HUNDRED
        }
    };
    Ok(round_money(amount))
}

/// Order total: max(0, Σ item totals − discount)
pub fn compute_order_total(items: &[OrderItem], discount: &Discount) -> EngineResult<OrderTotals> {
    let selections: Vec<&ItemSelection> = items.iter().map(|item| &item.selection).collect();
    compute_selection_totals(&selections, discount)
}

/// Same as [`compute_order_total`] for selections that are not committed yet
pub fn compute_selection_totals(
    selections: &[&ItemSelection],
    discount: &Discount,
) -> EngineResult<OrderTotals> {
    let mut subtotal = Decimal::ZERO;
    for (i, selection) in selections.iter().enumerate() {
        let item_total = compute_item_total(selection)?;
        subtotal = fits(&format!("items[{}]", i), subtotal.checked_add(item_total))?;
    }
    let subtotal = round_money(subtotal);
    let discount_amount = discount_amount(subtotal, discount)?;
    let total = round_money((subtotal - discount_amount).max(Decimal::ZERO));

    Ok(OrderTotals {
        subtotal,
        discount_amount,
        total,
    })
}

/// Amount still owed. Negative when the customer over-paid.
pub fn remaining_amount(total: Decimal, received: Decimal) -> Decimal {
    round_money(total - received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessorySelection, CutSelection, LaborSelection, WorkshopFabric};
    use crate::PieceCode;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scenario_selection() -> ItemSelection {
        ItemSelection {
            fabric: FabricSource::Workshop(WorkshopFabric {
                fabric_id: Some(Uuid::new_v4()),
                name: "Japanese polyester".to_string(),
                price_per_unit: dec("12.500"),
                unit: "meter".to_string(),
                meters: Some(dec("2")),
            }),
            cut: CutSelection {
                cut_id: Some(Uuid::new_v4()),
                name: "Kuwaiti".to_string(),
                price: dec("15.750"),
            },
            accessories: vec![AccessorySelection {
                accessory_id: Some(Uuid::new_v4()),
                name: "Cufflink".to_string(),
                unit_price: dec("2.250"),
                quantity: 2,
            }],
            labors: vec![],
        }
    }

    fn item(selection: ItemSelection) -> OrderItem {
        let total_price = compute_item_total(&selection).unwrap();
        OrderItem {
            id: Uuid::new_v4(),
            piece_code: PieceCode::generate(),
            selection,
            total_price,
        }
    }

    #[test]
    fn test_item_total_scenario() {
        let total = compute_item_total(&scenario_selection()).unwrap();
        assert_eq!(total, dec("45.250"));
        assert_eq!(total.to_string(), "45.250");
    }

    #[test]
    fn test_meters_default_to_one() {
        let mut selection = scenario_selection();
        if let FabricSource::Workshop(fabric) = &mut selection.fabric {
            fabric.meters = None;
        }
        assert_eq!(compute_item_total(&selection).unwrap(), dec("32.750"));
    }

    #[test]
    fn test_customer_fabric_costs_nothing() {
        let mut selection = scenario_selection();
        selection.fabric = FabricSource::CustomerSupplied {
            specification: "Own wool".to_string(),
        };
        assert_eq!(fabric_cost(&selection.fabric).unwrap(), Decimal::ZERO);
        assert_eq!(compute_item_total(&selection).unwrap(), dec("20.250"));
    }

    #[test]
    fn test_labor_is_added() {
        let mut selection = scenario_selection();
        selection.labors.push(LaborSelection {
            labor_id: None,
            name: "Hand embroidery".to_string(),
            price: dec("3.125"),
        });
        assert_eq!(compute_item_total(&selection).unwrap(), dec("48.375"));
    }

    #[test]
    fn test_zero_quantity_names_field() {
        let mut selection = scenario_selection();
        selection.accessories[0].quantity = 0;
        let err = compute_item_total(&selection).unwrap_err();
        assert_eq!(err.field(), Some("accessories[0].quantity"));
    }

    #[test]
    fn test_negative_meters_rejected() {
        let mut selection = scenario_selection();
        if let FabricSource::Workshop(fabric) = &mut selection.fabric {
            fabric.meters = Some(dec("-1"));
        }
        let err = compute_item_total(&selection).unwrap_err();
        assert_eq!(err.field(), Some("fabric.meters"));
    }

    #[test]
    fn test_percentage_discount_scenario() {
        let items = vec![item(scenario_selection())];
        let totals = compute_order_total(&items, &Discount::percentage(dec("10"))).unwrap();

        assert_eq!(totals.subtotal, dec("45.250"));
        assert_eq!(totals.discount_amount, dec("4.525"));
        assert_eq!(totals.total, dec("40.725"));
    }

    #[test]
    fn test_percentage_of_hundred() {
        let mut selection = scenario_selection();
        selection.fabric = FabricSource::CustomerSupplied {
            specification: String::new(),
        };
        selection.accessories.clear();
        selection.cut.price = dec("100");

        let totals = compute_order_total(&[item(selection)], &Discount::percentage(dec("10"))).unwrap();
        assert_eq!(totals.total, dec("90.000"));
    }

    #[test]
    fn test_zero_amount_discount_equals_sum() {
        let items = vec![item(scenario_selection()), item(scenario_selection())];
        let totals = compute_order_total(&items, &Discount::amount(Decimal::ZERO)).unwrap();
        assert_eq!(totals.total, dec("90.500"));
    }

    #[test]
    fn test_discount_larger_than_subtotal_clamps_to_zero() {
        let items = vec![item(scenario_selection())];
        let totals = compute_order_total(&items, &Discount::amount(dec("100"))).unwrap();
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_negative_discount_rejected() {
        let items = vec![item(scenario_selection())];
        let err = compute_order_total(&items, &Discount::amount(dec("-1"))).unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
        assert_eq!(err.field(), Some("discount.value"));
    }

    #[test]
    fn test_empty_order_totals_zero() {
        let totals = compute_order_total(&[], &Discount::none()).unwrap();
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_oversized_fabric_price_names_field() {
        let mut selection = scenario_selection();
        if let FabricSource::Workshop(fabric) = &mut selection.fabric {
            fabric.price_per_unit = Decimal::MAX;
        }
        let err = compute_item_total(&selection).unwrap_err();
        assert_eq!(err.field(), Some("fabric.price_per_unit"));
    }

    #[test]
    fn test_oversized_accessory_names_field() {
        let mut selection = scenario_selection();
        selection.accessories[0].unit_price = Decimal::MAX;
        let err = compute_item_total(&selection).unwrap_err();
        assert_eq!(err.field(), Some("accessories[0].unit_price"));
    }

    #[test]
    fn test_oversized_cut_names_field() {
        let mut selection = scenario_selection();
        selection.cut.price = Decimal::MAX;
        let err = compute_item_total(&selection).unwrap_err();
        assert_eq!(err.field(), Some("cut.price"));
    }

    #[test]
    fn test_oversized_percentage_names_field() {
        let items = vec![item(scenario_selection())];
        let err = compute_order_total(&items, &Discount::percentage(Decimal::MAX)).unwrap_err();
        assert_eq!(err.field(), Some("discount.value"));
    }

    #[test]
    fn test_selection_prices_rounded_to_subunit() {
        let mut selection = scenario_selection();
        selection.cut.price = dec("15.75");
        selection.accessories[0].unit_price = dec("2.2505");
        round_selection_prices(&mut selection);

        assert_eq!(selection.cut.price.to_string(), "15.750");
        assert_eq!(selection.accessories[0].unit_price.to_string(), "2.251");
        if let FabricSource::Workshop(fabric) = &selection.fabric {
            assert_eq!(fabric.price_per_unit.to_string(), "12.500");
        }
    }

    #[test]
    fn test_remaining_amount_can_go_negative() {
        assert_eq!(remaining_amount(dec("40.725"), dec("40")), dec("0.725"));
        assert_eq!(remaining_amount(dec("40.725"), dec("50")), dec("-9.275"));
    }
}
