//! Fallback for editors without a dedicated migrator.

use super::{DataTypeProperty, PropertyMigrator};
use crate::context::MigrationContext;
use serde_json::{Map, Value};

/// Copies every pre-value verbatim into the configuration object.
///
/// Registered as the registry fallback rather than under an alias.
#[derive(Debug, Default)]
pub struct PassThroughMigrator;

impl PropertyMigrator for PassThroughMigrator {
    fn editors(&self) -> &[&'static str] {
        &[]
    }

    fn config_values(&self, property: &DataTypeProperty<'_>, _context: &MigrationContext) -> Value {
        let mut config = Map::new();
        for pre_value in property.pre_values.iter() {
            if !config.contains_key(&pre_value.alias) {
                config.insert(pre_value.alias.clone(), Value::String(pre_value.value.clone()));
            }
        }
        Value::Object(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreValues;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_copies_pre_values_first_wins() {
        let ctx = MigrationContext::new(Uuid::new_v4());
        let pre_values = PreValues::new()
            .with("colors", "red,green")
            .with("mode", "a")
            .with("mode", "b");
        let property = DataTypeProperty {
            pre_values: &pre_values,
            ..DataTypeProperty::from_editor_alias("Custom.Picker")
        };

        assert_eq!(
            PassThroughMigrator.config_values(&property, &ctx),
            json!({"colors": "red,green", "mode": "a"})
        );
        assert_eq!(PassThroughMigrator.editor_alias(&property, &ctx), "Custom.Picker");
    }
}
