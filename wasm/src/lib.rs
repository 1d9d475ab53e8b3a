//! WebAssembly module for the Tailoring Orders Platform
//!
//! Provides client-side computation for the order forms:
//! - Measurement unit conversion
//! - Piece and order pricing
//! - Price formatting

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::{
    compute_item_total, compute_selection_totals, convert_value, format_price, parse_decimal,
    Discount, ItemSelection, MeasurementSet, MeasurementUnit,
};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn unit(raw: &str) -> Result<MeasurementUnit, JsValue> {
    MeasurementUnit::from_str(raw).ok_or_else(|| js_error(format!("Unknown unit '{}'", raw)))
}

/// Convert a single measurement value, e.g. `("100", "cm", "inch") -> "39.4"`.
/// Non-numeric input is returned unchanged.
#[wasm_bindgen]
pub fn convert_measurement(value: &str, from: &str, to: &str) -> Result<String, JsValue> {
    Ok(convert_value(value, unit(from)?, unit(to)?))
}

/// Convert a whole measurement sheet (JSON) to another unit
#[wasm_bindgen]
pub fn convert_measurement_set(set_json: &str, to: &str) -> Result<String, JsValue> {
    let set: MeasurementSet = serde_json::from_str(set_json)
        .map_err(|e| js_error(format!("Invalid measurements JSON: {}", e)))?;
    serde_json::to_string(&set.converted(unit(to)?)).map_err(js_error)
}

/// Price one piece from its selection JSON; returns the formatted total
#[wasm_bindgen]
pub fn price_item(selection_json: &str) -> Result<String, JsValue> {
    let selection: ItemSelection = serde_json::from_str(selection_json)
        .map_err(|e| js_error(format!("Invalid selection JSON: {}", e)))?;
    let total = compute_item_total(&selection).map_err(js_error)?;
    Ok(format_price(total))
}

/// Price a whole order; returns the totals breakdown as JSON
#[wasm_bindgen]
pub fn price_order(selections_json: &str, discount_json: &str) -> Result<String, JsValue> {
    let selections: Vec<ItemSelection> = serde_json::from_str(selections_json)
        .map_err(|e| js_error(format!("Invalid selections JSON: {}", e)))?;
    let discount: Discount = serde_json::from_str(discount_json)
        .map_err(|e| js_error(format!("Invalid discount JSON: {}", e)))?;

    let refs: Vec<&ItemSelection> = selections.iter().collect();
    let totals = compute_selection_totals(&refs, &discount).map_err(js_error)?;
    serde_json::to_string(&totals).map_err(js_error)
}

/// Format a typed amount with the three currency decimals
#[wasm_bindgen]
pub fn format_amount(raw: &str) -> Result<String, JsValue> {
    let value: Decimal = parse_decimal("amount", raw).map_err(js_error)?;
    Ok(format_price(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_measurement() {
        assert_eq!(convert_measurement("100", "cm", "inch").unwrap(), "39.4");
        assert_eq!(convert_measurement("abc", "cm", "inch").unwrap(), "abc");
    }

    #[test]
    fn test_convert_measurement_set_keeps_notes() {
        let json = r#"{"unit":"inch","chest":"10","notes":"slim"}"#;
        let converted: MeasurementSet =
            serde_json::from_str(&convert_measurement_set(json, "cm").unwrap()).unwrap();
        assert_eq!(converted.unit, MeasurementUnit::Cm);
        assert_eq!(converted.chest, "25.4");
        assert_eq!(converted.notes, "slim");
    }

    #[test]
    fn test_price_item() {
        let json = r#"{
            "fabric": {"source": "workshop", "fabric_id": null, "name": "Polyester",
                       "price_per_unit": "12.500", "unit": "meter", "meters": "2"},
            "cut": {"cut_id": null, "name": "Kuwaiti", "price": "15.750"},
            "accessories": [{"accessory_id": null, "name": "Cufflink", "unit_price": "2.250", "quantity": 2}]
        }"#;
        assert_eq!(price_item(json).unwrap(), "45.250");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("0").unwrap(), "0.000");
        assert_eq!(format_amount("12.5").unwrap(), "12.500");
    }
}
