//! Decimal editor.

use super::{aliases, to_config, DataTypeProperty, PropertyMigrator};
use crate::context::MigrationContext;
use crate::model::PreValues;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecimalConfiguration {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub step: Option<Decimal>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub max: Option<Decimal>,
}

impl DecimalConfiguration {
    pub fn from_pre_values(pre_values: &PreValues) -> Self {
        Self {
            min: pre_values.get_decimal("min"),
            step: pre_values.get_decimal("step"),
            max: pre_values.get_decimal("max"),
        }
    }
}

#[derive(Debug, Default)]
pub struct DecimalMigrator;

impl PropertyMigrator for DecimalMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::DECIMAL]
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        to_config(&DecimalConfiguration::from_pre_values(property.pre_values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_fractional_bounds() {
        let pre_values = PreValues::new()
            .with("min", "0.25")
            .with("max", "nope")
            .with("step", "0.5");
        let config = DecimalConfiguration::from_pre_values(&pre_values);

        assert_eq!(config.min, Some(Decimal::new(25, 2)));
        assert_eq!(config.step, Some(Decimal::new(5, 1)));
        assert_eq!(config.max, None);
        assert_eq!(to_config(&config), serde_json::json!({"min": 0.25, "step": 0.5}));
    }
}
