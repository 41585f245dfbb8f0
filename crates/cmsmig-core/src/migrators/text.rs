//! Single and multi-line text editors.

use super::{aliases, to_config, DataTypeProperty, PropertyMigrator};
use crate::context::MigrationContext;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextboxConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<i64>,
}

#[derive(Debug, Default)]
pub struct TextboxMigrator;

impl PropertyMigrator for TextboxMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::TEXTBOX]
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        to_config(&TextboxConfiguration {
            max_chars: property.pre_values.get_int("maxChars"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAreaConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
}

/// The legacy multi-line textbox becomes the text area editor.
#[derive(Debug, Default)]
pub struct TextAreaMigrator;

impl PropertyMigrator for TextAreaMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::TEXTBOX_MULTIPLE, aliases::TEXT_AREA]
    }

    fn editor_alias(&self, _property: &DataTypeProperty<'_>, _context: &MigrationContext) -> String {
        aliases::TEXT_AREA.to_string()
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        to_config(&TextAreaConfiguration {
            max_chars: property.pre_values.get_int("maxChars"),
            rows: property.pre_values.get_int("rows"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_textbox_max_chars() {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let pre_values = crate::model::PreValues::new().with("maxChars", "120");
        let property = DataTypeProperty {
            pre_values: &pre_values,
            ..DataTypeProperty::from_editor_alias(aliases::TEXTBOX)
        };

        assert_eq!(TextboxMigrator.config_values(&property, &ctx), json!({"maxChars": 120}));
    }

    #[test]
    fn test_text_area_renames_legacy_editor() {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let property = DataTypeProperty::from_editor_alias(aliases::TEXTBOX_MULTIPLE);

        assert_eq!(TextAreaMigrator.editor_alias(&property, &ctx), aliases::TEXT_AREA);
        assert_eq!(TextAreaMigrator.config_values(&property, &ctx), json!({}));
    }
}
