//! Numeric range editor.

use super::{aliases, to_config, DataTypeProperty, PropertyMigrator};
use crate::context::MigrationContext;
use crate::model::PreValues;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Configuration of the integer editor.
///
/// A bound or step that is missing or malformed in the legacy data is left
/// out of the configuration, which the editor reads as "no limit" / step 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegerConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub step: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl IntegerConfiguration {
    pub fn from_pre_values(pre_values: &PreValues) -> Self {
        Self {
            min: pre_values.get_int("min"),
            step: pre_values.get_decimal("step"),
            max: pre_values.get_int("max"),
        }
    }
}

#[derive(Debug, Default)]
pub struct IntegerMigrator;

impl PropertyMigrator for IntegerMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::INTEGER]
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        to_config(&IntegerConfiguration::from_pre_values(property.pre_values))
    }
}
