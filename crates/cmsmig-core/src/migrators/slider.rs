//! Slider editor: legacy keys renamed onto the new configuration fields.

use super::{aliases, map_pre_values, to_config, DataTypeProperty, PreValueTarget, PropertyMigrator};
use crate::context::MigrationContext;
use crate::model::prevalues::{parse_bool, parse_decimal};
use crate::model::PreValues;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Legacy pre-value alias to configuration field.
///
/// `precision` and `step` both feed `StepIncrements`; `step` is later in the
/// table so it wins when both are present.
pub const SLIDER_MAPPINGS: &[(&str, &str)] = &[
    ("enableRange", "EnableRange"),
    ("precision", "StepIncrements"),
    ("InitVal1", "InitialValue"),
    ("InitVal2", "InitialValue2"),
    ("maxVal", "MaximumValue"),
    ("minVal", "MinimumValue"),
    ("step", "StepIncrements"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SliderConfiguration {
    #[serde(rename = "enableRange")]
    pub enable_range: bool,
    #[serde(rename = "initVal1", with = "rust_decimal::serde::float")]
    pub initial_value: Decimal,
    #[serde(rename = "initVal2", with = "rust_decimal::serde::float")]
    pub initial_value2: Decimal,
    #[serde(rename = "minVal", with = "rust_decimal::serde::float")]
    pub minimum_value: Decimal,
    #[serde(rename = "maxVal", with = "rust_decimal::serde::float")]
    pub maximum_value: Decimal,
    #[serde(rename = "step", with = "rust_decimal::serde::float")]
    pub step_increments: Decimal,
}

impl SliderConfiguration {
    pub fn from_pre_values(pre_values: &PreValues) -> Self {
        map_pre_values(pre_values, SLIDER_MAPPINGS)
    }
}

impl PreValueTarget for SliderConfiguration {
    fn assign(&mut self, field: &str, raw: &str) -> bool {
        if field == "EnableRange" {
            return match parse_bool(raw) {
                Some(value) => {
                    self.enable_range = value;
                    true
                }
                None => false,
            };
        }

        let Some(value) = parse_decimal(raw) else {
            return false;
        };
        let slot = match field {
            "InitialValue" => &mut self.initial_value,
            "InitialValue2" => &mut self.initial_value2,
            "MinimumValue" => &mut self.minimum_value,
            "MaximumValue" => &mut self.maximum_value,
            "StepIncrements" => &mut self.step_increments,
            _ => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Default)]
pub struct SliderMigrator;

impl PropertyMigrator for SliderMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::SLIDER]
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        to_config(&SliderConfiguration::from_pre_values(property.pre_values))
    }
}
