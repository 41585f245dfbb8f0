//! Data type handler.

use super::{HandlerOutcome, MigrationHandler, MigrationScope};
use crate::error::MigrationError;
use crate::migrators::DataTypeProperty;
use crate::model::{EntityType, LegacyDataType, LegacyExport, MigratedDataType, MigratedEntity};
use tracing::debug;

/// Converts data types through their property migrators.
///
/// Conversion is spread over `conversion_workers` scoped threads; output
/// keeps export order.
#[derive(Debug, Default)]
pub struct DataTypeHandler;

impl MigrationHandler for DataTypeHandler {
    fn entity_type(&self) -> EntityType {
        EntityType::DataType
    }

    fn prepare(&self, export: &LegacyExport, scope: &MigrationScope<'_>) -> Result<(), MigrationError> {
        let context = scope.context;

        for data_type in &export.data_types {
            scope.check_cancelled()?;
            context.add_data_type_definition(data_type.key, &data_type.editor_alias);

            if scope.is_blocked_data_type(data_type) {
                context.add_blocked_data_type(data_type.key);
                continue;
            }

            let Some(migrator) = scope.registry.resolve(&data_type.editor_alias).migrator().cloned() else {
                continue;
            };

            if let Some(replacement) = migrator.replacement(data_type, context) {
                debug!(
                    data_type = %data_type.alias,
                    replacement = %replacement.key,
                    "Data type replaced"
                );
                context.add_replacement_data_type(data_type.key, replacement.key);
                if let Some(editor_alias) = &replacement.editor_alias {
                    context.add_data_type_definition(replacement.key, editor_alias);
                }
                if let Some(variation) = replacement.variation {
                    context.add_data_type_variation(replacement.key, variation);
                }
            }

            let property = DataTypeProperty::from_data_type(data_type);
            if let Some(variation) = migrator.variation(&property, context) {
                context.add_data_type_variation(data_type.key, variation);
            }
        }

        Ok(())
    }

    fn migrate(
        &self,
        export: &LegacyExport,
        scope: &MigrationScope<'_>,
    ) -> Result<HandlerOutcome, MigrationError> {
        let context = scope.context;
        let mut outcome = HandlerOutcome::default();
        let mut pending = Vec::with_capacity(export.data_types.len());

        for data_type in &export.data_types {
            if scope.is_blocked_data_type(data_type) {
                debug!(
                    data_type = %data_type.alias,
                    editor_alias = %data_type.editor_alias,
                    "Skipping blocked data type"
                );
                scope.report.record_blocked();
                outcome.skip();
            } else if context.get_replacement_data_type(data_type.key) != data_type.key {
                scope.report.record_replaced();
                outcome.skip();
            } else {
                pending.push(data_type);
            }
        }

        for converted in convert_all(&pending, scope)? {
            match converted {
                Some(data_type) => outcome.push(MigratedEntity::DataType(data_type)),
                None => outcome.skip(),
            }
        }

        Ok(outcome)
    }
}

fn convert_all(
    data_types: &[&LegacyDataType],
    scope: &MigrationScope<'_>,
) -> Result<Vec<Option<MigratedDataType>>, MigrationError> {
    let workers = scope.config.conversion_workers.max(1);
    if workers == 1 || data_types.len() < 2 {
        return convert_chunk(data_types, scope);
    }

    let chunk_size = data_types.len().div_ceil(workers);
    std::thread::scope(|threads| {
        let handles: Vec<_> = data_types
            .chunks(chunk_size)
            .map(|chunk| threads.spawn(move || convert_chunk(chunk, scope)))
            .collect();

        let mut converted = Vec::with_capacity(data_types.len());
        for handle in handles {
            match handle.join() {
                Ok(chunk) => converted.extend(chunk?),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok(converted)
    })
}

fn convert_chunk(
    data_types: &[&LegacyDataType],
    scope: &MigrationScope<'_>,
) -> Result<Vec<Option<MigratedDataType>>, MigrationError> {
    data_types
        .iter()
        .map(|data_type| {
            scope.check_cancelled()?;
            Ok(convert(data_type, scope))
        })
        .collect()
}

/// Convert one data type; `None` when nothing can migrate it.
fn convert(data_type: &LegacyDataType, scope: &MigrationScope<'_>) -> Option<MigratedDataType> {
    let resolution = scope.resolve_editor(&data_type.editor_alias);
    let Some(migrator) = resolution.migrator() else {
        debug!(data_type = %data_type.alias, "Skipping data type without migrator");
        return None;
    };
    let context = scope.context;
    let property = DataTypeProperty::from_data_type(data_type);

    Some(MigratedDataType {
        key: data_type.key,
        alias: data_type.alias.clone(),
        editor_alias: migrator.editor_alias(&property, context),
        database_type: migrator.database_type(&property, context),
        config: migrator.config_values(&property, context),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MigrationContext, Variation};
    use crate::handlers::test_support::Harness;
    use crate::migrators::{aliases, PropertyMigrator, Replacement};
    use crate::pipeline::PipelineConfig;
    use crate::registry::MigratorRegistry;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    const GRID_REPLACEMENT: Uuid = Uuid::from_u128(0xB10C);

    /// Swaps every legacy grid for a shared block list data type.
    struct GridToBlockList;

    impl PropertyMigrator for GridToBlockList {
        fn editors(&self) -> &[&'static str] {
            &["Legacy.Grid"]
        }

        fn replacement(&self, _data_type: &LegacyDataType, _context: &MigrationContext) -> Option<Replacement> {
            Some(
                Replacement::new(GRID_REPLACEMENT)
                    .with_editor_alias("Umbraco.BlockList")
                    .with_variation(Variation::Culture),
            )
        }
    }

    fn key(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn export() -> LegacyExport {
        LegacyExport::new()
            .with_data_type(
                LegacyDataType::new(key(1), "Age", aliases::INTEGER)
                    .with_pre_value("min", "0")
                    .with_pre_value("max", "120"),
            )
            .with_data_type(LegacyDataType::new(key(2), "Notes", aliases::TEXTBOX_MULTIPLE))
            .with_data_type(LegacyDataType::new(key(3), "Widgets", "Custom.Widgets"))
            .with_data_type(LegacyDataType::new(key(4), "Hidden", aliases::TRUE_FALSE))
    }

    #[test]
    fn test_converts_with_registered_migrators() {
        let harness = Harness::new();
        let export = export();
        harness.context.add_blocked("DataType", "Hidden");
        DataTypeHandler.prepare(&export, &harness.scope()).unwrap();

        let outcome = DataTypeHandler.migrate(&export, &harness.scope()).unwrap();
        assert_eq!(outcome.migrated.len(), 2);
        assert_eq!(outcome.skipped, 2);

        let MigratedEntity::DataType(age) = &outcome.migrated[0] else {
            panic!("expected data type");
        };
        assert_eq!(age.config, json!({"min": 0, "max": 120}));

        let MigratedEntity::DataType(notes) = &outcome.migrated[1] else {
            panic!("expected data type");
        };
        assert_eq!(notes.editor_alias, aliases::TEXT_AREA);

        assert_eq!(harness.report.unmapped_editors(), vec!["Custom.Widgets"]);
        assert_eq!(
            harness.context.get_data_type_from_definition(key(3)),
            "Custom.Widgets"
        );
    }

    #[test]
    fn test_block_by_editor_alias() {
        let harness = Harness::new();
        let export = export();
        harness.context.add_blocked("DataType", "custom.widgets");
        DataTypeHandler.prepare(&export, &harness.scope()).unwrap();

        assert!(harness.context.is_blocked_data_type(key(3)));
        assert!(!harness.context.is_blocked_data_type(key(1)));

        let outcome = DataTypeHandler.migrate(&export, &harness.scope()).unwrap();
        assert_eq!(outcome.migrated.len(), 3);
        assert_eq!(outcome.skipped, 1);
        assert!(harness.report.unmapped_editors().is_empty());
    }

    #[test]
    fn test_fallback_converts_unmapped() {
        let harness = Harness::with_registry(MigratorRegistry::with_defaults().with_passthrough_fallback());
        let export = LegacyExport::new().with_data_type(
            LegacyDataType::new(key(3), "Widgets", "Custom.Widgets").with_pre_value("columns", "3"),
        );

        let outcome = DataTypeHandler.migrate(&export, &harness.scope()).unwrap();
        let MigratedEntity::DataType(widgets) = &outcome.migrated[0] else {
            panic!("expected data type");
        };
        assert_eq!(widgets.editor_alias, "Custom.Widgets");
        assert_eq!(widgets.config, json!({"columns": "3"}));
        assert!(harness.report.unmapped_editors().is_empty());
    }

    #[test]
    fn test_replacement_recorded_and_original_skipped() {
        let mut registry = MigratorRegistry::with_defaults();
        registry.register(Arc::new(GridToBlockList));
        let harness = Harness::with_registry(registry);
        let export = LegacyExport::new()
            .with_data_type(LegacyDataType::new(key(5), "Body Grid", "Legacy.Grid"));

        DataTypeHandler.prepare(&export, &harness.scope()).unwrap();
        let ctx = &harness.context;
        assert_eq!(ctx.get_replacement_data_type(key(5)), GRID_REPLACEMENT);
        assert_eq!(ctx.get_data_type_from_definition(GRID_REPLACEMENT), "Umbraco.BlockList");
        assert_eq!(ctx.get_data_type_variation(GRID_REPLACEMENT), Variation::Culture);

        let outcome = DataTypeHandler.migrate(&export, &harness.scope()).unwrap();
        assert!(outcome.migrated.is_empty());
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_parallel_conversion_keeps_export_order() {
        let mut harness = Harness::new();
        harness.config = PipelineConfig::new().with_conversion_workers(4);

        let mut export = LegacyExport::new();
        for n in 0..50u128 {
            export = export.with_data_type(LegacyDataType::new(key(n), format!("Number {n}"), aliases::INTEGER));
        }

        let outcome = DataTypeHandler.migrate(&export, &harness.scope()).unwrap();
        let keys: Vec<Uuid> = outcome.migrated.iter().map(MigratedEntity::key).collect();
        assert_eq!(keys, (0..50u128).map(key).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancelled_conversion() {
        let harness = Harness::new();
        harness.cancel.cancel();

        let err = DataTypeHandler.migrate(&export(), &harness.scope()).unwrap_err();
        assert!(matches!(err, MigrationError::Cancelled { .. }));
    }
}
