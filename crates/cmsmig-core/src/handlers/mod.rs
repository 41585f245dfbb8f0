//! Entity handlers.
//!
//! One handler per [`EntityType`]. Each has a preparation step that only
//! writes facts into the context and a conversion step that only reads them.
//! The pipeline runs every preparation step before any conversion step.

mod content;
mod content_type;
mod data_type;
mod template;

pub use content::ContentHandler;
pub use content_type::ContentTypeHandler;
pub use data_type::DataTypeHandler;
pub use template::TemplateHandler;

use crate::context::MigrationContext;
use crate::error::MigrationError;
use crate::migrators::DataTypeProperty;
use crate::model::{EntityType, LegacyDataType, LegacyExport, MigratedEntity};
use crate::pipeline::{CancellationToken, PipelineConfig, ReportCollector};
use crate::registry::{MigratorRegistry, MigratorResolution};
use tracing::{info, warn};

/// Everything a handler may use during a run.
#[derive(Debug, Clone, Copy)]
pub struct MigrationScope<'a> {
    pub context: &'a MigrationContext,
    pub registry: &'a MigratorRegistry,
    pub report: &'a ReportCollector,
    pub cancel: &'a CancellationToken,
    pub config: &'a PipelineConfig,
}

impl MigrationScope<'_> {
    /// Fail with [`MigrationError::Cancelled`] once the token is cancelled.
    pub fn check_cancelled(&self) -> Result<(), MigrationError> {
        if self.cancel.is_cancelled() {
            return Err(MigrationError::Cancelled {
                migration_id: self.context.migration_id(),
            });
        }
        Ok(())
    }

    /// Check if a block rule names the data type by alias or by editor alias.
    pub fn is_blocked_data_type(&self, data_type: &LegacyDataType) -> bool {
        let item_type = EntityType::DataType.name();
        self.context.is_blocked(item_type, &data_type.alias)
            || self.context.is_blocked(item_type, &data_type.editor_alias)
    }

    /// Resolve the migrator for a legacy editor alias and note in the report
    /// when it is unmapped or handled by the fallback. Each alias is logged
    /// once per run.
    pub fn resolve_editor(&self, editor_alias: &str) -> MigratorResolution {
        let resolution = self.registry.resolve(editor_alias);
        match &resolution {
            MigratorResolution::Unmapped => {
                if self.report.record_unmapped(editor_alias) {
                    warn!(editor_alias = %editor_alias, "No migrator registered for editor");
                }
            }
            MigratorResolution::Fallback(_) => {
                if self.report.record_fallback(editor_alias) {
                    info!(editor_alias = %editor_alias, "Using fallback migrator for editor");
                }
            }
            MigratorResolution::Registered(_) => {}
        }
        resolution
    }

    /// Editor alias a legacy editor alias becomes after migration.
    ///
    /// Asks the resolved migrator with only the alias known; unmapped aliases
    /// are kept as they are.
    pub fn updated_editor_alias(&self, editor_alias: &str) -> String {
        match self.registry.resolve(editor_alias).migrator() {
            Some(migrator) => migrator.editor_alias(
                &DataTypeProperty::from_editor_alias(editor_alias),
                self.context,
            ),
            None => editor_alias.to_string(),
        }
    }
}

/// Result of a handler's conversion step.
#[derive(Debug, Default)]
pub struct HandlerOutcome {
    /// Converted entities, in export order.
    pub migrated: Vec<MigratedEntity>,
    /// Entities read but not converted.
    pub skipped: usize,
}

impl HandlerOutcome {
    pub fn push(&mut self, entity: MigratedEntity) {
        self.migrated.push(entity);
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn processed(&self) -> usize {
        self.migrated.len() + self.skipped
    }
}

/// Two-pass migration of one entity type.
pub trait MigrationHandler: Send + Sync {
    fn entity_type(&self) -> EntityType;

    /// Record the facts this handler owns. Runs even when the handler is
    /// disabled, so other handlers can resolve references to its entities.
    fn prepare(&self, export: &LegacyExport, scope: &MigrationScope<'_>) -> Result<(), MigrationError>;

    /// Convert this handler's entities using the populated context.
    fn migrate(
        &self,
        export: &LegacyExport,
        scope: &MigrationScope<'_>,
    ) -> Result<HandlerOutcome, MigrationError>;
}

/// The built-in handlers in pass order.
pub fn default_handlers() -> Vec<Box<dyn MigrationHandler>> {
    vec![
        Box::new(DataTypeHandler),
        Box::new(ContentTypeHandler),
        Box::new(TemplateHandler),
        Box::new(ContentHandler),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use uuid::Uuid;

    /// Owns everything a [`MigrationScope`] borrows.
    pub struct Harness {
        pub context: MigrationContext,
        pub registry: MigratorRegistry,
        pub report: ReportCollector,
        pub cancel: CancellationToken,
        pub config: PipelineConfig,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_registry(MigratorRegistry::with_defaults())
        }

        pub fn with_registry(registry: MigratorRegistry) -> Self {
            Self {
                context: MigrationContext::new(Uuid::new_v4()),
                registry,
                report: ReportCollector::new(),
                cancel: CancellationToken::new(),
                config: PipelineConfig::new().single_threaded(),
            }
        }

        pub fn scope(&self) -> MigrationScope<'_> {
            MigrationScope {
                context: &self.context,
                registry: &self.registry,
                report: &self.report,
                cancel: &self.cancel,
                config: &self.config,
            }
        }

        /// Prepare every handler, as the pipeline does before converting.
        pub fn prepare_all(&self, export: &LegacyExport) {
            for handler in default_handlers() {
                handler.prepare(export, &self.scope()).unwrap();
            }
        }
    }
}
