//! Editor alias to migrator dispatch.
//!
//! The registry is built by explicit registration calls before a run and is
//! read-only afterwards; the pipeline holds it behind an `Arc`.

use crate::migrators::{
    DecimalMigrator, IntegerMigrator, LabelMigrator, PassThroughMigrator, PropertyMigrator,
    SliderMigrator, TextAreaMigrator, TextboxMigrator, TrueFalseMigrator,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of looking up an editor alias.
#[derive(Clone)]
pub enum MigratorResolution {
    /// A migrator is registered for the alias.
    Registered(Arc<dyn PropertyMigrator>),
    /// No migrator is registered; the fallback handles it.
    Fallback(Arc<dyn PropertyMigrator>),
    /// No migrator and no fallback.
    Unmapped,
}

impl MigratorResolution {
    /// The migrator to use, if any.
    pub fn migrator(&self) -> Option<&Arc<dyn PropertyMigrator>> {
        match self {
            MigratorResolution::Registered(migrator) | MigratorResolution::Fallback(migrator) => {
                Some(migrator)
            }
            MigratorResolution::Unmapped => None,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, MigratorResolution::Unmapped)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, MigratorResolution::Fallback(_))
    }
}

impl std::fmt::Debug for MigratorResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigratorResolution::Registered(_) => f.write_str("Registered"),
            MigratorResolution::Fallback(_) => f.write_str("Fallback"),
            MigratorResolution::Unmapped => f.write_str("Unmapped"),
        }
    }
}

/// Case-insensitive map from legacy editor alias to migrator.
#[derive(Clone, Default)]
pub struct MigratorRegistry {
    migrators: HashMap<String, Arc<dyn PropertyMigrator>>,
    fallback: Option<Arc<dyn PropertyMigrator>>,
}

impl MigratorRegistry {
    /// Create an empty registry without a fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in migrator, without a fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(IntegerMigrator));
        registry.register(Arc::new(DecimalMigrator));
        registry.register(Arc::new(SliderMigrator));
        registry.register(Arc::new(TextboxMigrator));
        registry.register(Arc::new(TextAreaMigrator));
        registry.register(Arc::new(TrueFalseMigrator));
        registry.register(Arc::new(LabelMigrator));
        registry
    }

    /// Register a migrator under every alias it declares.
    ///
    /// A later registration for an alias overrides an earlier one, so hosts can
    /// replace built-in migrators.
    pub fn register(&mut self, migrator: Arc<dyn PropertyMigrator>) -> &mut Self {
        for alias in migrator.editors() {
            self.migrators
                .insert(alias.to_lowercase(), Arc::clone(&migrator));
        }
        self
    }

    /// Remove the migrator for an alias. Returns true if one was registered.
    pub fn exclude(&mut self, editor_alias: &str) -> bool {
        self.migrators.remove(&editor_alias.to_lowercase()).is_some()
    }

    /// Set the migrator used for aliases without a registration.
    pub fn with_fallback(mut self, migrator: Arc<dyn PropertyMigrator>) -> Self {
        self.fallback = Some(migrator);
        self
    }

    /// Use [`PassThroughMigrator`] as the fallback.
    pub fn with_passthrough_fallback(self) -> Self {
        self.with_fallback(Arc::new(PassThroughMigrator))
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// The migrator registered for an alias, ignoring the fallback.
    pub fn get(&self, editor_alias: &str) -> Option<Arc<dyn PropertyMigrator>> {
        self.migrators.get(&editor_alias.to_lowercase()).cloned()
    }

    /// Resolve an alias, falling back when nothing is registered.
    pub fn resolve(&self, editor_alias: &str) -> MigratorResolution {
        if let Some(migrator) = self.get(editor_alias) {
            return MigratorResolution::Registered(migrator);
        }
        match &self.fallback {
            Some(fallback) => MigratorResolution::Fallback(Arc::clone(fallback)),
            None => MigratorResolution::Unmapped,
        }
    }

    /// Registered aliases (lower-cased), sorted.
    pub fn editor_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.migrators.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn len(&self) -> usize {
        self.migrators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrators.is_empty()
    }
}

impl std::fmt::Debug for MigratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigratorRegistry")
            .field("editor_aliases", &self.editor_aliases())
            .field("has_fallback", &self.has_fallback())
            .finish()
    }
}
