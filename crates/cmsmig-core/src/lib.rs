//! cmsmig core - Migration engine for CMS content exports.
//!
//! Transforms an exported entity graph (data types, content types, templates
//! and content items) from a legacy representation into the new one. A run is
//! two passes over the export:
//!
//! 1. **Prepare**: every handler records the cross-reference facts it owns in
//!    the [`MigrationContext`] (keys, compositions, editor alias renames,
//!    replacements, variations).
//! 2. **Convert**: every enabled handler converts its entities, resolving
//!    references through the fully populated context and the
//!    [`MigratorRegistry`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cmsmig_core::{
//!     MemoryWriter, MigrationOptions, MigrationPipeline, MigrationPlan, MigratorRegistry,
//!     PipelineConfig,
//! };
//!
//! let registry = Arc::new(MigratorRegistry::with_defaults());
//! let pipeline = MigrationPipeline::new(registry, PipelineConfig::default());
//!
//! let plan = MigrationPlan::resolve(&MigrationOptions::new("migrations/site"))?;
//! let mut writer = MemoryWriter::new();
//! let report = pipeline.run(&plan, &export, &mut writer)?;
//!
//! for alias in &report.unmapped_editors {
//!     println!("no migrator for {alias}");
//! }
//! ```

pub mod context;
pub mod error;
pub mod handlers;
pub mod migrators;
pub mod model;
pub mod pipeline;
pub mod plan;
pub mod registry;

pub use context::{ContextStats, EditorAliasInfo, MigrationContext, Variation};
pub use error::{MigrationError, WriterError};
pub use handlers::{HandlerOutcome, MigrationHandler, MigrationScope};
pub use migrators::{ContentProperty, DataTypeProperty, PropertyMigrator, Replacement};
pub use model::{
    DatabaseType, EntityType, HandlerGroup, LegacyContent, LegacyContentType, LegacyDataType,
    LegacyExport, LegacyPropertyType, LegacyPropertyValue, LegacyTemplate, MigratedContent,
    MigratedContentType, MigratedDataType, MigratedEntity, MigratedTemplate, PreValue, PreValues,
};
pub use pipeline::{
    CancellationToken, HandlerProgress, MemoryWriter, MigrationPipeline, MigrationReport,
    MigrationWriter, PipelineConfig, RunState, RunStatus, StepStatus,
};
pub use plan::{DefaultProfile, HandlerOption, MigrationOptions, MigrationPlan, MigrationProfile};
pub use registry::{MigratorRegistry, MigratorResolution};
