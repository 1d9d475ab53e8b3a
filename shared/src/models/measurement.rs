//! Customer body measurements and cm/inch conversion

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Centimetres per inch
fn cm_per_inch() -> Decimal {
    Decimal::new(254, 2)
}

/// Unit shared by every numeric field of a measurement set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    #[default]
    Cm,
    Inch,
}

impl MeasurementUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::Cm => "cm",
            MeasurementUnit::Inch => "inch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cm" => Some(MeasurementUnit::Cm),
            "inch" => Some(MeasurementUnit::Inch),
            _ => None,
        }
    }
}

impl std::fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convert a single measurement value between units.
///
/// Values are kept as the operator typed them. Anything that does not parse
/// as a number (including the empty string) is returned unchanged, as is any
/// same-unit conversion and any value too large to convert. Converted values
/// are rounded to one decimal.
pub fn convert_value(value: &str, from: MeasurementUnit, to: MeasurementUnit) -> String {
    if from == to {
        return value.to_string();
    }
    let Ok(number) = Decimal::from_str(value.trim()) else {
        return value.to_string();
    };

    let converted = match (from, to) {
        (MeasurementUnit::Cm, MeasurementUnit::Inch) => number.checked_div(cm_per_inch()),
        (MeasurementUnit::Inch, MeasurementUnit::Cm) => number.checked_mul(cm_per_inch()),
        _ => Some(number),
    };
    let Some(converted) = converted else {
        return value.to_string();
    };

    let rounded = converted.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}", rounded)
}

/// A customer's measurement sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MeasurementSet {
    pub unit: MeasurementUnit,
    #[serde(default)]
    pub chest: String,
    #[serde(default)]
    pub waist: String,
    #[serde(default)]
    pub shoulder: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub arm_length: String,
    #[serde(default)]
    pub neck_circumference: String,
    #[serde(default)]
    pub arm_opening: String,
    #[serde(default)]
    pub bottom_width: String,
    /// Free text, never converted
    #[serde(default)]
    pub notes: String,
}

impl MeasurementSet {
    fn numeric_fields_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.chest,
            &mut self.waist,
            &mut self.shoulder,
            &mut self.length,
            &mut self.arm_length,
            &mut self.neck_circumference,
            &mut self.arm_opening,
            &mut self.bottom_width,
        ]
    }

    /// Switch the whole set to `unit`, converting every numeric field
    pub fn convert_to(&mut self, unit: MeasurementUnit) {
        if self.unit == unit {
            return;
        }
        let from = self.unit;
        for field in self.numeric_fields_mut() {
            *field = convert_value(field, from, unit);
        }
        self.unit = unit;
    }

    /// Converted copy, leaving `self` untouched
    pub fn converted(&self, unit: MeasurementUnit) -> Self {
        let mut copy = self.clone();
        copy.convert_to(unit);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> MeasurementSet {
        MeasurementSet {
            unit: MeasurementUnit::Cm,
            chest: "100".to_string(),
            waist: "85.5".to_string(),
            shoulder: "45".to_string(),
            length: "140".to_string(),
            arm_length: "60".to_string(),
            neck_circumference: "40".to_string(),
            arm_opening: "".to_string(),
            bottom_width: "n/a".to_string(),
            notes: "Loose fit, 2.54 allowance".to_string(),
        }
    }

    #[test]
    fn test_convert_cm_to_inch() {
        assert_eq!(convert_value("100", MeasurementUnit::Cm, MeasurementUnit::Inch), "39.4");
        assert_eq!(convert_value("2.54", MeasurementUnit::Cm, MeasurementUnit::Inch), "1.0");
    }

    #[test]
    fn test_convert_inch_to_cm() {
        assert_eq!(convert_value("10", MeasurementUnit::Inch, MeasurementUnit::Cm), "25.4");
        assert_eq!(convert_value("39.4", MeasurementUnit::Inch, MeasurementUnit::Cm), "100.1");
    }

    #[test]
    fn test_convert_passes_through_non_numeric() {
        assert_eq!(convert_value("", MeasurementUnit::Cm, MeasurementUnit::Inch), "");
        assert_eq!(convert_value("wide", MeasurementUnit::Cm, MeasurementUnit::Inch), "wide");
    }

    #[test]
    fn test_convert_passes_through_oversized_value() {
        let huge = Decimal::MAX.to_string();
        assert_eq!(convert_value(&huge, MeasurementUnit::Inch, MeasurementUnit::Cm), huge);

        let mut set = MeasurementSet {
            unit: MeasurementUnit::Inch,
            chest: huge.clone(),
            waist: "10".to_string(),
            ..MeasurementSet::default()
        };
        set.convert_to(MeasurementUnit::Cm);
        assert_eq!(set.chest, huge);
        assert_eq!(set.waist, "25.4");
    }

    #[test]
    fn test_convert_same_unit_is_noop() {
        assert_eq!(convert_value("12.345", MeasurementUnit::Cm, MeasurementUnit::Cm), "12.345");
    }

    #[test]
    fn test_set_conversion_is_atomic_and_skips_notes() {
        let mut set = sample_set();
        set.convert_to(MeasurementUnit::Inch);

        assert_eq!(set.unit, MeasurementUnit::Inch);
        assert_eq!(set.chest, "39.4");
        assert_eq!(set.waist, "33.7");
        assert_eq!(set.shoulder, "17.7");
        assert_eq!(set.arm_opening, "");
        assert_eq!(set.bottom_width, "n/a");
        assert_eq!(set.notes, "Loose fit, 2.54 allowance");
    }

    #[test]
    fn test_set_conversion_to_current_unit_is_noop() {
        let set = sample_set();
        assert_eq!(set.converted(MeasurementUnit::Cm), set);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!(MeasurementUnit::from_str("cm"), Some(MeasurementUnit::Cm));
        assert_eq!(MeasurementUnit::from_str("inch"), Some(MeasurementUnit::Inch));
        assert_eq!(MeasurementUnit::from_str("mm"), None);
    }
}
