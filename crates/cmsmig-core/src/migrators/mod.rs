//! Property migrators.
//!
//! A property migrator owns one or more legacy editor aliases and knows how to
//! turn a data type's pre-values into the new configuration, which editor
//! alias and storage type the data type ends up with, and how stored content
//! values change. Migrators only read the [`MigrationContext`]; all writes to
//! it happen in the preparation pass, driven by the handlers.
//!
//! Migrators are independent of each other and may be invoked in any order
//! or in parallel.

mod decimal;
mod integer;
mod label;
mod mapping;
mod passthrough;
mod slider;
mod text;
mod true_false;

pub use decimal::{DecimalConfiguration, DecimalMigrator};
pub use integer::{IntegerConfiguration, IntegerMigrator};
pub use label::LabelMigrator;
pub use mapping::{map_pre_values, PreValueTarget};
pub use passthrough::PassThroughMigrator;
pub use slider::{SliderConfiguration, SliderMigrator};
pub use text::{TextAreaConfiguration, TextAreaMigrator, TextboxConfiguration, TextboxMigrator};
pub use true_false::{TrueFalseConfiguration, TrueFalseMigrator};

use crate::context::{MigrationContext, Variation};
use crate::model::{DatabaseType, LegacyDataType, PreValues};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Legacy editor aliases of the built-in migrators.
pub mod aliases {
    pub const INTEGER: &str = "Umbraco.Integer";
    pub const DECIMAL: &str = "Umbraco.Decimal";
    pub const SLIDER: &str = "Umbraco.Slider";
    pub const TEXTBOX: &str = "Umbraco.Textbox";
    pub const TEXTBOX_MULTIPLE: &str = "Umbraco.TextboxMultiple";
    pub const TEXT_AREA: &str = "Umbraco.TextArea";
    pub const TRUE_FALSE: &str = "Umbraco.TrueFalse";
    pub const NO_EDIT: &str = "Umbraco.NoEdit";
    pub const LABEL: &str = "Umbraco.Label";
}

/// The data type a migrator is asked about.
///
/// During content type preparation only the editor alias is known, so
/// `pre_values` is empty there.
#[derive(Debug, Clone, Copy)]
pub struct DataTypeProperty<'a> {
    pub data_type_alias: &'a str,
    pub editor_alias: &'a str,
    pub database_type: DatabaseType,
    pub pre_values: &'a PreValues,
}

impl<'a> DataTypeProperty<'a> {
    /// Describe a full legacy data type.
    pub fn from_data_type(data_type: &'a LegacyDataType) -> Self {
        Self {
            data_type_alias: &data_type.alias,
            editor_alias: &data_type.editor_alias,
            database_type: data_type.database_type,
            pre_values: &data_type.pre_values,
        }
    }

    /// Describe a data type known only by its editor alias.
    pub fn from_editor_alias(editor_alias: &'a str) -> Self {
        Self {
            data_type_alias: "",
            editor_alias,
            database_type: DatabaseType::default(),
            pre_values: PreValues::empty(),
        }
    }
}

/// A content property value being converted.
#[derive(Debug, Clone, Copy)]
pub struct ContentProperty<'a> {
    pub content_type_alias: &'a str,
    pub property_alias: &'a str,
    /// Legacy editor alias of the property.
    pub editor_alias: &'a str,
    pub value: Option<&'a str>,
}

/// A data type that is substituted wholesale by another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Key of the data type taking over.
    pub key: Uuid,
    /// Editor alias of the replacement, if it is not in the export.
    pub editor_alias: Option<String>,
    /// Variation imposed by the replacement.
    pub variation: Option<Variation>,
}

impl Replacement {
    pub fn new(key: Uuid) -> Self {
        Self {
            key,
            editor_alias: None,
            variation: None,
        }
    }

    pub fn with_editor_alias(mut self, editor_alias: impl Into<String>) -> Self {
        self.editor_alias = Some(editor_alias.into());
        self
    }

    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.variation = Some(variation);
        self
    }
}

/// Transform for the data types of one or more legacy editors.
///
/// Only [`editors`](Self::editors) is required; every hook defaults to
/// leaving the legacy value unchanged.
pub trait PropertyMigrator: Send + Sync {
    /// Legacy editor aliases handled by this migrator.
    fn editors(&self) -> &[&'static str];

    /// Editor alias after migration.
    fn editor_alias(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> String {
        property.editor_alias.to_string()
    }

    /// Storage type after migration.
    fn database_type(
        &self,
        property: &DataTypeProperty<'_>,
        _context: &MigrationContext,
    ) -> DatabaseType {
        property.database_type
    }

    /// New configuration built from the legacy pre-values.
    fn config_values(&self, _property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        Value::Object(Map::new())
    }

    /// Stored content value after migration.
    fn content_value(&self, property: &ContentProperty<'_>, _context: &MigrationContext) -> Option<String> {
        property.value.map(str::to_string)
    }

    /// Variation the data type imposes on properties using it.
    fn variation(
        &self,
        _property: &DataTypeProperty<'_>,
        _context: &MigrationContext,
    ) -> Option<Variation> {
        None
    }

    /// Data type replacing this one entirely.
    fn replacement(
        &self,
        _data_type: &LegacyDataType,
        _context: &MigrationContext,
    ) -> Option<Replacement> {
        None
    }
}

/// Serialize a typed configuration into the JSON stored on the data type.
pub(crate) fn to_config<T: Serialize>(config: &T) -> Value {
    serde_json::to_value(config).unwrap_or_else(|_| Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl PropertyMigrator for Bare {
        fn editors(&self) -> &[&'static str] {
            &["Custom.Bare"]
        }
    }

    #[test]
    fn test_default_hooks_keep_legacy_values() {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let data_type = LegacyDataType::new(Uuid::from_u128(1), "Bare", "Custom.Bare")
            .with_database_type(DatabaseType::Ntext)
            .with_pre_value("anything", "1");
        let property = DataTypeProperty::from_data_type(&data_type);

        assert_eq!(Bare.editor_alias(&property, &ctx), "Custom.Bare");
        assert_eq!(Bare.database_type(&property, &ctx), DatabaseType::Ntext);
        assert_eq!(Bare.config_values(&property, &ctx), serde_json::json!({}));
        assert_eq!(Bare.variation(&property, &ctx), None);
        assert_eq!(Bare.replacement(&data_type, &ctx), None);

        let content = ContentProperty {
            content_type_alias: "Home",
            property_alias: "body",
            editor_alias: "Custom.Bare",
            value: Some("hello"),
        };
        assert_eq!(Bare.content_value(&content, &ctx), Some("hello".to_string()));
    }

    #[test]
    fn test_editor_alias_only_property_has_no_pre_values() {
        let property = DataTypeProperty::from_editor_alias(aliases::SLIDER);
        assert!(property.pre_values.is_empty());
        assert_eq!(property.editor_alias, "Umbraco.Slider");
    }
}
