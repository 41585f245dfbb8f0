//! Checkbox editor.

use super::{aliases, to_config, ContentProperty, DataTypeProperty, PropertyMigrator};
use crate::context::MigrationContext;
use crate::model::prevalues::parse_bool;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrueFalseConfiguration {
    pub default: bool,
}

/// Also normalises stored values, which legacy exports hold as any of
/// "1", "0", "True" or "False", to "1"/"0".
#[derive(Debug, Default)]
pub struct TrueFalseMigrator;

impl PropertyMigrator for TrueFalseMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::TRUE_FALSE]
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        to_config(&TrueFalseConfiguration {
            default: property.pre_values.get_bool("default").unwrap_or(false),
        })
    }

    fn content_value(&self, property: &ContentProperty<'_>, _context: &MigrationContext) -> Option<String> {
        let raw = property.value?;
        match parse_bool(raw) {
            Some(true) => Some("1".to_string()),
            Some(false) => Some("0".to_string()),
            None => Some(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn content(value: Option<&str>) -> Option<String> {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let property = ContentProperty {
            content_type_alias: "Page",
            property_alias: "hideFromNav",
            editor_alias: aliases::TRUE_FALSE,
            value,
        };
        TrueFalseMigrator.content_value(&property, &ctx)
    }

    #[test]
    fn test_content_values_normalised() {
        assert_eq!(content(Some("True")).as_deref(), Some("1"));
        assert_eq!(content(Some("false")).as_deref(), Some("0"));
        assert_eq!(content(Some("1")).as_deref(), Some("1"));
        assert_eq!(content(Some("n/a")).as_deref(), Some("n/a"));
        assert_eq!(content(None), None);
    }

    #[test]
    fn test_default_pre_value() {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let pre_values = crate::model::PreValues::new().with("default", "1");
        let property = DataTypeProperty {
            pre_values: &pre_values,
            ..DataTypeProperty::from_editor_alias(aliases::TRUE_FALSE)
        };
        assert_eq!(
            TrueFalseMigrator.config_values(&property, &ctx),
            serde_json::json!({"default": true})
        );
    }
}
