//! Content handler.

use super::{HandlerOutcome, MigrationHandler, MigrationScope};
use crate::error::MigrationError;
use crate::migrators::ContentProperty;
use crate::model::{
    EntityType, LegacyContent, LegacyExport, MigratedContent, MigratedEntity,
    MigratedPropertyValue,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

/// Records content keys and paths, then converts stored property values
/// through the migrator of each property's legacy editor.
#[derive(Debug, Default)]
pub struct ContentHandler;

impl MigrationHandler for ContentHandler {
    fn entity_type(&self) -> EntityType {
        EntityType::Content
    }

    fn prepare(&self, export: &LegacyExport, scope: &MigrationScope<'_>) -> Result<(), MigrationError> {
        let by_key: HashMap<Uuid, &LegacyContent> =
            export.content.iter().map(|item| (item.key, item)).collect();

        for item in &export.content {
            scope.check_cancelled()?;
            scope.context.add_content_key(item.key, &item.alias);
            scope.context.add_content_path(item.key, &content_path(item, &by_key));
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

        for item in &export.content {
            scope.check_cancelled()?;
            if context.is_blocked(EntityType::Content.name(), &item.alias)
                || context.is_blocked(EntityType::ContentType.name(), &item.content_type_alias)
            {
                debug!(content = %item.alias, "Skipping blocked content");
                scope.report.record_blocked();
                outcome.skip();
                continue;
            }
            outcome.push(MigratedEntity::Content(convert(item, scope)));
        }

        Ok(outcome)
    }
}

/// Slash-separated aliases from the root down to `item`.
///
/// A parent missing from the export ends the walk, as does a cycle.
fn content_path(item: &LegacyContent, by_key: &HashMap<Uuid, &LegacyContent>) -> String {
    let mut segments = vec![item.alias.as_str()];
    let mut visited = HashSet::from([item.key]);
    let mut parent = item.parent_key;

    while let Some(key) = parent {
        if !visited.insert(key) {
            break;
        }
        let Some(ancestor) = by_key.get(&key) else {
            break;
        };
        segments.push(&ancestor.alias);
        parent = ancestor.parent_key;
    }

    segments.reverse();
    format!("/{}", segments.join("/"))
}

fn convert(item: &LegacyContent, scope: &MigrationScope<'_>) -> MigratedContent {
    let context = scope.context;

    let content_type_key = context.get_content_type_key(&item.content_type_alias);
    if content_type_key.is_nil() {
        warn!(
            content = %item.alias,
            content_type = %item.content_type_alias,
            "Content type not found in export"
        );
        scope.report.warn(format!(
            "content '{}' uses unknown content type '{}'",
            item.alias, item.content_type_alias
        ));
    }

    let template_key = item
        .template_alias
        .as_deref()
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .and_then(|alias| {
            let key = context.get_template_key(alias);
            if key.is_nil() {
                scope.report.warn(format!(
                    "content '{}' uses unknown template '{alias}'",
                    item.alias
                ));
                None
            } else {
                Some(key)
            }
        });

    let mut properties = Vec::with_capacity(item.properties.len());
    for property in &item.properties {
        if context.is_ignored_property(&item.content_type_alias, &property.alias) {
            scope.report.record_ignored_property();
            continue;
        }
        if context.is_blocked_property(&item.content_type_alias, &property.alias) {
            scope.report.record_blocked_property();
            continue;
        }

        let Some(info) = context.get_editor_alias(&item.content_type_alias, &property.alias) else {
            properties.push(MigratedPropertyValue {
                alias: property.alias.clone(),
                editor_alias: None,
                value: Some(property.value.clone()),
            });
            continue;
        };

        let content_property = ContentProperty {
            content_type_alias: &item.content_type_alias,
            property_alias: &property.alias,
            editor_alias: &info.original,
            value: Some(&property.value),
        };
        let value = match scope.registry.resolve(&info.original).migrator() {
            Some(migrator) => migrator.content_value(&content_property, context),
            None => Some(property.value.clone()),
        };

        properties.push(MigratedPropertyValue {
            alias: property.alias.clone(),
            editor_alias: Some(info.updated),
            value,
        });
    }

    MigratedContent {
        key: item.key,
        alias: item.alias.clone(),
        content_type_alias: item.content_type_alias.clone(),
        content_type_key,
        parent_key: item.parent_key,
        path: context.get_content_path(item.key),
        template_key,
        properties,
    }
}
