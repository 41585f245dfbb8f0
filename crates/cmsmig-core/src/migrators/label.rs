//! Read-only label editor.

use super::{aliases, DataTypeProperty, PropertyMigrator};
use crate::context::MigrationContext;
use serde_json::{json, Value};

/// Maps the legacy "no edit" editor onto the label editor, carrying the value
/// storage type into the configuration.
#[derive(Debug, Default)]
pub struct LabelMigrator;

impl PropertyMigrator for LabelMigrator {
    fn editors(&self) -> &[&'static str] {
        &[aliases::NO_EDIT, aliases::LABEL]
    }

    fn editor_alias(&self, _property: &DataTypeProperty<'_>, _context: &MigrationContext) -> String {
        aliases::LABEL.to_string()
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        json!({ "umbracoDataValueType": property.database_type.value_type() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DatabaseType, LegacyDataType};
    use uuid::Uuid;

    #[test]
    fn test_no_edit_becomes_label() {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let data_type = LegacyDataType::new(Uuid::from_u128(3), "Id", aliases::NO_EDIT)
            .with_database_type(DatabaseType::Integer);
        let property = DataTypeProperty::from_data_type(&data_type);

        assert_eq!(LabelMigrator.editor_alias(&property, &ctx), "Umbraco.Label");
        assert_eq!(
            LabelMigrator.config_values(&property, &ctx),
            json!({"umbracoDataValueType": "INT"})
        );
    }
}
