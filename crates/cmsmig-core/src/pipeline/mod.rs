//! Two-pass migration pipeline.
//!
//! Builds the context from a plan, runs every handler's preparation step in
//! pass order, then the conversion step of each enabled handler, handing the
//! output to a [`MigrationWriter`].

mod config;
mod report;
mod state;
mod writer;

pub use config::PipelineConfig;
pub use report::{MigrationReport, ReportCollector};
pub use state::{current_timestamp, HandlerProgress, RunState, RunStatus, StepStatus};
pub use writer::{MemoryWriter, MigrationWriter};

use crate::context::MigrationContext;
use crate::error::MigrationError;
use crate::handlers::{default_handlers, MigrationHandler, MigrationScope};
use crate::model::{EntityType, LegacyExport};
use crate::plan::MigrationPlan;
use crate::registry::MigratorRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Shared flag that stops a run between entities.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs migrations against a fixed registry and configuration.
pub struct MigrationPipeline {
    registry: Arc<MigratorRegistry>,
    config: PipelineConfig,
    /// Sorted by entity type, one per type.
    handlers: Vec<Box<dyn MigrationHandler>>,
}

impl MigrationPipeline {
    /// Create a pipeline with the built-in handlers.
    pub fn new(registry: Arc<MigratorRegistry>, config: PipelineConfig) -> Self {
        Self {
            registry,
            config,
            handlers: default_handlers(),
        }
    }

    /// Replace the handler for an entity type.
    pub fn with_handler(mut self, handler: Box<dyn MigrationHandler>) -> Self {
        let entity_type = handler.entity_type();
        self.handlers
            .retain(|existing| existing.entity_type() != entity_type);
        self.handlers.push(handler);
        self.handlers.sort_by_key(|handler| handler.entity_type());
        self
    }

    pub fn registry(&self) -> &MigratorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a migration with a fresh context.
    pub fn run(
        &self,
        plan: &MigrationPlan,
        export: &LegacyExport,
        writer: &mut dyn MigrationWriter,
    ) -> Result<MigrationReport, MigrationError> {
        self.run_with_cancel(plan, export, writer, &CancellationToken::new())
    }

    /// Run a migration that can be stopped through `cancel`.
    pub fn run_with_cancel(
        &self,
        plan: &MigrationPlan,
        export: &LegacyExport,
        writer: &mut dyn MigrationWriter,
        cancel: &CancellationToken,
    ) -> Result<MigrationReport, MigrationError> {
        let context = MigrationContext::new(Uuid::new_v4());
        self.run_in_context(&context, plan, export, writer, cancel)
    }

    /// Run a migration against a caller-provided context.
    ///
    /// The context may already hold facts, for example keys of entities
    /// migrated by an earlier run; first-write-wins keeps those.
    #[instrument(skip_all, fields(migration_id = %context.migration_id(), target = %plan.target()))]
    pub fn run_in_context(
        &self,
        context: &MigrationContext,
        plan: &MigrationPlan,
        export: &LegacyExport,
        writer: &mut dyn MigrationWriter,
        cancel: &CancellationToken,
    ) -> Result<MigrationReport, MigrationError> {
        let report = ReportCollector::new();
        let scope = MigrationScope {
            context,
            registry: &self.registry,
            report: &report,
            cancel,
            config: &self.config,
        };
        let mut state = RunState::new(
            context.migration_id(),
            self.handlers.iter().map(|handler| handler.entity_type()),
        );

        match self.execute(plan, export, writer, &scope, &mut state) {
            Ok(()) => {
                state.complete();
                let report = report.finish(&state, context.stats());
                info!(
                    migrated = report.migrated(),
                    blocked = report.blocked,
                    unmapped = report.unmapped_editors.len(),
                    warnings = report.warnings.len(),
                    "Migration completed"
                );
                Ok(report)
            }
            Err(error @ MigrationError::Cancelled { .. }) => {
                state.cancel();
                warn!(status = %state.status, "Migration cancelled");
                Err(error)
            }
            Err(error) => {
                state.fail(error.to_string());
                warn!(error = %error, "Migration failed");
                Err(error)
            }
        }
    }

    fn execute(
        &self,
        plan: &MigrationPlan,
        export: &LegacyExport,
        writer: &mut dyn MigrationWriter,
        scope: &MigrationScope<'_>,
        state: &mut RunState,
    ) -> Result<(), MigrationError> {
        let context = scope.context;
        plan.apply(context);

        state.start();
        let started = Instant::now();
        for handler in &self.handlers {
            debug!(handler = %handler.entity_type(), "Preparing");
            handler.prepare(export, scope)?;
        }
        let stats = context.stats();
        info!(
            data_types = stats.data_type_definitions,
            content_types = stats.content_type_keys,
            templates = stats.template_keys,
            content = stats.content_keys,
            duration_ms = started.elapsed().as_millis() as u64,
            "Preparation complete"
        );

        state.start_converting();
        for handler in &self.handlers {
            let entity_type = handler.entity_type();
            if !plan.is_enabled(entity_type) {
                debug!(handler = %entity_type, "Handler disabled");
                if let Some(progress) = state.handler_mut(entity_type) {
                    progress.skip();
                }
                continue;
            }

            if let Some(progress) = state.handler_mut(entity_type) {
                progress.start();
            }
            let result = self.convert(handler.as_ref(), export, writer, scope);
            let Some(progress) = state.handler_mut(entity_type) else {
                result?;
                continue;
            };
            match result {
                Ok((processed, migrated, skipped)) => {
                    progress.complete(processed, migrated, skipped);
                    info!(
                        handler = %entity_type,
                        migrated,
                        skipped,
                        "Handler complete"
                    );
                }
                Err(error) => {
                    progress.fail(error.to_string());
                    return Err(error);
                }
            }
        }

        writer.finish()?;
        Ok(())
    }

    /// Convert one handler's entities and write them.
    fn convert(
        &self,
        handler: &dyn MigrationHandler,
        export: &LegacyExport,
        writer: &mut dyn MigrationWriter,
        scope: &MigrationScope<'_>,
    ) -> Result<(usize, usize, usize), MigrationError> {
        let outcome = handler.migrate(export, scope)?;

        if self.config.fail_on_unmapped {
            let aliases = scope.report.unmapped_editors();
            if !aliases.is_empty() {
                return Err(MigrationError::UnmappedEditors { aliases });
            }
        }

        for entity in &outcome.migrated {
            writer.write(entity)?;
        }
        Ok((outcome.processed(), outcome.migrated.len(), outcome.skipped))
    }

    /// Entity types of the installed handlers, in pass order.
    pub fn entity_types(&self) -> Vec<EntityType> {
        self.handlers.iter().map(|handler| handler.entity_type()).collect()
    }
}

impl std::fmt::Debug for MigrationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationPipeline")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("handlers", &self.entity_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerOutcome;
    use crate::migrators::aliases;
    use crate::model::{LegacyDataType, MigratedEntity, MigratedTemplate};
    use crate::plan::MigrationOptions;

    /// Emits a fixed template so handler replacement is observable.
    struct FixedTemplates;

    impl MigrationHandler for FixedTemplates {
        fn entity_type(&self) -> EntityType {
            EntityType::Template
        }

        fn prepare(&self, _export: &LegacyExport, _scope: &MigrationScope<'_>) -> Result<(), MigrationError> {
            Ok(())
        }

        fn migrate(
            &self,
            _export: &LegacyExport,
            _scope: &MigrationScope<'_>,
        ) -> Result<HandlerOutcome, MigrationError> {
            let mut outcome = HandlerOutcome::default();
            outcome.push(MigratedEntity::Template(MigratedTemplate {
                key: Uuid::from_u128(99),
                alias: "Fixed".to_string(),
                master_key: None,
            }));
            Ok(outcome)
        }
    }

    fn pipeline() -> MigrationPipeline {
        MigrationPipeline::new(
            Arc::new(MigratorRegistry::with_defaults()),
            PipelineConfig::new().single_threaded(),
        )
    }

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        let shared = token.clone();
        assert!(!token.is_cancelled());
        shared.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_with_handler_replaces_by_entity_type() {
        let pipeline = pipeline().with_handler(Box::new(FixedTemplates));
        assert_eq!(pipeline.entity_types(), EntityType::ALL.to_vec());

        let plan = MigrationPlan::resolve(&MigrationOptions::new("out")).unwrap();
        let mut writer = MemoryWriter::new();
        let report = pipeline.run(&plan, &LegacyExport::new(), &mut writer).unwrap();

        assert_eq!(writer.len(), 1);
        assert_eq!(writer.entities()[0].alias(), "Fixed");
        assert_eq!(report.handler(EntityType::Template).unwrap().migrated, 1);
        assert!(writer.is_finished());
    }

    #[test]
    fn test_disabled_handler_is_skipped_but_prepared() {
        let export = LegacyExport::new()
            .with_data_type(LegacyDataType::new(Uuid::from_u128(1), "Age", aliases::INTEGER));
        let options = MigrationOptions::new("out").with_handlers(|entity_type| entity_type != EntityType::DataType);
        let plan = MigrationPlan::resolve(&options).unwrap();

        let context = MigrationContext::new(Uuid::new_v4());
        let mut writer = MemoryWriter::new();
        let report = pipeline()
            .run_in_context(&context, &plan, &export, &mut writer, &CancellationToken::new())
            .unwrap();

        assert!(writer.is_empty());
        assert_eq!(
            report.handler(EntityType::DataType).unwrap().status,
            StepStatus::Skipped
        );
        assert_eq!(context.get_data_type_from_definition(Uuid::from_u128(1)), aliases::INTEGER);
        assert_eq!(report.migration_id, context.migration_id());
    }
}
