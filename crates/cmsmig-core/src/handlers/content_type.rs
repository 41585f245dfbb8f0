//! Content type handler.

use super::{HandlerOutcome, MigrationHandler, MigrationScope};
use crate::context::Variation;
use crate::error::MigrationError;
use crate::model::{
    CompositionRef, EntityType, LegacyContentType, LegacyExport, MigratedContentType,
    MigratedEntity, MigratedPropertyType,
};
use tracing::{debug, warn};

/// Records content type keys, compositions and property editor renames, then
/// rewrites properties onto their migrated data types.
#[derive(Debug, Default)]
pub struct ContentTypeHandler;

impl MigrationHandler for ContentTypeHandler {
    fn entity_type(&self) -> EntityType {
        EntityType::ContentType
    }

    fn prepare(&self, export: &LegacyExport, scope: &MigrationScope<'_>) -> Result<(), MigrationError> {
        let context = scope.context;

        for content_type in &export.content_types {
            scope.check_cancelled()?;
            context.add_content_type_key(&content_type.alias, content_type.key);
            context.add_content_type_compositions(&content_type.alias, &content_type.compositions);

            for property in &content_type.properties {
                if context.is_blocked_data_type(property.data_type_key) {
                    context.add_blocked_property(&content_type.alias, &property.alias);
                    continue;
                }

                let original = context.get_data_type_from_definition(property.data_type_key);
                if original.is_empty() {
                    debug!(
                        content_type = %content_type.alias,
                        property = %property.alias,
                        data_type = %property.data_type_key,
                        "Property references an unknown data type"
                    );
                    continue;
                }

                let target = context.get_replacement_data_type(property.data_type_key);
                let source = if target == property.data_type_key {
                    scope.resolve_editor(&original);
                    original.clone()
                } else {
                    let replacement = context.get_data_type_from_definition(target);
                    if replacement.is_empty() {
                        original.clone()
                    } else {
                        replacement
                    }
                };

                let updated = scope.updated_editor_alias(&source);
                context.add_content_property(&content_type.alias, &property.alias, &original, &updated);
            }
        }

        Ok(())
    }

    fn migrate(
        &self,
        export: &LegacyExport,
        scope: &MigrationScope<'_>,
    ) -> Result<HandlerOutcome, MigrationError> {
        let mut outcome = HandlerOutcome::default();

        for content_type in &export.content_types {
            scope.check_cancelled()?;
            if scope
                .context
                .is_blocked(EntityType::ContentType.name(), &content_type.alias)
            {
                debug!(content_type = %content_type.alias, "Skipping blocked content type");
                scope.report.record_blocked();
                outcome.skip();
                continue;
            }
            outcome.push(MigratedEntity::ContentType(convert(content_type, scope)));
        }

        Ok(outcome)
    }
}

fn convert(content_type: &LegacyContentType, scope: &MigrationScope<'_>) -> MigratedContentType {
    let context = scope.context;

    let mut properties = Vec::with_capacity(content_type.properties.len());
    for property in &content_type.properties {
        if context.is_ignored_property(&content_type.alias, &property.alias) {
            scope.report.record_ignored_property();
            continue;
        }
        if context.is_blocked_data_type(property.data_type_key) {
            debug!(
                content_type = %content_type.alias,
                property = %property.alias,
                "Dropping property of blocked data type"
            );
            scope.report.record_blocked_property();
            continue;
        }

        let data_type_key = context.get_replacement_data_type(property.data_type_key);
        let editor_alias = context
            .get_editor_alias(&content_type.alias, &property.alias)
            .map(|info| info.updated)
            .unwrap_or_else(|| context.get_data_type_from_definition(data_type_key));

        properties.push(MigratedPropertyType {
            alias: property.alias.clone(),
            name: property.name.clone(),
            data_type_key,
            editor_alias,
            variation: context.get_data_type_variation(data_type_key),
        });
    }

    let variation = properties
        .iter()
        .fold(Variation::Nothing, |variation, property| variation.union(property.variation));

    let mut compositions = Vec::with_capacity(content_type.compositions.len());
    for alias in &content_type.compositions {
        if context.is_blocked(EntityType::ContentType.name(), alias) {
            debug!(
                content_type = %content_type.alias,
                composition = %alias,
                "Dropping blocked composition"
            );
            continue;
        }

        let key = context.get_content_type_key(alias);
        if key.is_nil() {
            warn!(
                content_type = %content_type.alias,
                composition = %alias,
                "Composition not found in export"
            );
            scope.report.warn(format!(
                "content type '{}' composes unknown type '{alias}'",
                content_type.alias
            ));
            continue;
        }
        compositions.push(CompositionRef {
            alias: alias.clone(),
            key,
        });
    }

    MigratedContentType {
        key: content_type.key,
        alias: content_type.alias.clone(),
        variation,
        compositions,
        properties,
    }
}
