//! Run-scoped knowledge base shared by every handler and migrator.
//!
//! The context is created once at the start of a run, populated during the
//! preparation pass and consulted during conversion. It never performs any
//! transformation itself.
//!
//! ## Rules
//!
//! - Every `add_*` is first-write-wins: adding an existing key is a no-op.
//! - Alias-keyed tables are case-insensitive, key-keyed tables are exact.
//! - Every `get_*` is total and answers a miss with a sentinel (empty string,
//!   nil key, [`Variation::Nothing`], the original key, or `None`).
//!
//! All tables are [`DashMap`]s, so preparation may populate the context from
//! several threads; `entry().or_insert()` keeps first-write-wins atomic.

mod variation;

pub use variation::{ParseVariationError, Variation};

use dashmap::{DashMap, DashSet};
use serde::Serialize;
use uuid::Uuid;

/// Editor alias of a property before and after migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorAliasInfo {
    /// Editor alias in the legacy export.
    pub original: String,
    /// Editor alias the property has after migration.
    pub updated: String,
}

impl EditorAliasInfo {
    /// Create a new alias pair.
    pub fn new(original: impl Into<String>, updated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            updated: updated.into(),
        }
    }

    /// Check if the editor alias changed.
    pub fn is_renamed(&self) -> bool {
        self.original != self.updated
    }
}

/// Number of entries held by each table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub blocked_items: usize,
    pub blocked_data_types: usize,
    pub blocked_properties: usize,
    pub ignored_properties: usize,
    pub data_type_definitions: usize,
    pub data_type_replacements: usize,
    pub data_type_variations: usize,
    pub content_keys: usize,
    pub content_paths: usize,
    pub content_type_keys: usize,
    pub content_type_compositions: usize,
    pub property_editor_aliases: usize,
    pub template_keys: usize,
}

/// Case-insensitive form of an alias used as a table key.
fn fold(alias: &str) -> String {
    alias.to_lowercase()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Mutable fact store for a single migration run.
pub struct MigrationContext {
    migration_id: Uuid,
    /// (entity type, alias), folded.
    blocked: DashSet<(String, String)>,
    /// Keys of data types excluded from the migration.
    blocked_data_types: DashSet<Uuid>,
    /// (content type, property alias), folded, for properties backed by a
    /// blocked data type.
    blocked_properties: DashSet<(String, String)>,
    /// (content type, property alias), folded.
    ignored_properties: DashSet<(String, String)>,
    /// Property aliases ignored on every content type, folded.
    global_ignored_properties: DashSet<String>,
    /// Data type key -> legacy editor alias.
    data_type_definitions: DashMap<Uuid, String>,
    /// Data type key -> key of the data type replacing it.
    data_type_replacements: DashMap<Uuid, Uuid>,
    data_type_variations: DashMap<Uuid, Variation>,
    /// Content key -> content alias.
    content_keys: DashMap<Uuid, String>,
    /// Content key -> path of aliases from the root.
    content_paths: DashMap<Uuid, String>,
    content_type_keys: DashMap<String, Uuid>,
    /// Content type alias -> composed aliases in insertion order.
    content_type_compositions: DashMap<String, Vec<String>>,
    /// (content type, property alias), folded -> editor alias pair.
    property_editor_aliases: DashMap<(String, String), EditorAliasInfo>,
    template_keys: DashMap<String, Uuid>,
}

impl MigrationContext {
    /// Create an empty context for the run identified by `migration_id`.
    pub fn new(migration_id: Uuid) -> Self {
        Self {
            migration_id,
            blocked: DashSet::new(),
            blocked_data_types: DashSet::new(),
            blocked_properties: DashSet::new(),
            ignored_properties: DashSet::new(),
            global_ignored_properties: DashSet::new(),
            data_type_definitions: DashMap::new(),
            data_type_replacements: DashMap::new(),
            data_type_variations: DashMap::new(),
            content_keys: DashMap::new(),
            content_paths: DashMap::new(),
            content_type_keys: DashMap::new(),
            content_type_compositions: DashMap::new(),
            property_editor_aliases: DashMap::new(),
            template_keys: DashMap::new(),
        }
    }

    /// The run this context belongs to.
    pub fn migration_id(&self) -> Uuid {
        self.migration_id
    }

    // Templates

    /// Record the key of a template.
    pub fn add_template_key(&self, template_alias: &str, template_key: Uuid) {
        if is_blank(template_alias) {
            return;
        }
        self.template_keys
            .entry(fold(template_alias))
            .or_insert(template_key);
    }

    /// Key of a template, or the nil key if unknown.
    pub fn get_template_key(&self, template_alias: &str) -> Uuid {
        self.template_keys
            .get(fold(template_alias).as_str())
            .map(|key| *key)
            .unwrap_or_else(Uuid::nil)
    }

    // Content types

    /// Record the key of a content type.
    pub fn add_content_type_key(&self, content_type_alias: &str, content_type_key: Uuid) {
        if is_blank(content_type_alias) {
            return;
        }
        self.content_type_keys
            .entry(fold(content_type_alias))
            .or_insert(content_type_key);
    }

    /// Key of a content type, or the nil key if unknown.
    pub fn get_content_type_key(&self, content_type_alias: &str) -> Uuid {
        self.content_type_keys
            .get(fold(content_type_alias).as_str())
            .map(|key| *key)
            .unwrap_or_else(Uuid::nil)
    }

    /// Record the compositions of a content type.
    ///
    /// Ignored when the alias is blank or there are no compositions. Duplicate
    /// composition aliases (case-insensitive) keep their first position.
    pub fn add_content_type_compositions<I, S>(&self, content_type_alias: &str, compositions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if is_blank(content_type_alias) {
            return;
        }

        let mut ordered: Vec<String> = Vec::new();
        for alias in compositions {
            let alias = alias.as_ref();
            let folded = fold(alias);
            if is_blank(alias) || ordered.iter().any(|a| fold(a) == folded) {
                continue;
            }
            ordered.push(alias.to_string());
        }

        if ordered.is_empty() {
            return;
        }

        self.content_type_compositions
            .entry(fold(content_type_alias))
            .or_insert(ordered);
    }

    /// Compositions of a content type in insertion order; empty if unknown.
    pub fn get_content_type_compositions(&self, content_type_alias: &str) -> Vec<String> {
        self.content_type_compositions
            .get(fold(content_type_alias).as_str())
            .map(|compositions| compositions.clone())
            .unwrap_or_default()
    }

    // Content

    /// Record the path of a content item.
    pub fn add_content_path(&self, key: Uuid, path: &str) {
        self.content_paths
            .entry(key)
            .or_insert_with(|| path.to_string());
    }

    /// Path of a content item, or an empty string if unknown.
    pub fn get_content_path(&self, key: Uuid) -> String {
        self.content_paths
            .get(&key)
            .map(|path| path.clone())
            .unwrap_or_default()
    }

    /// Record the alias of a content item.
    pub fn add_content_key(&self, key: Uuid, alias: &str) {
        self.content_keys
            .entry(key)
            .or_insert_with(|| alias.to_string());
    }

    /// Alias of a content item, or an empty string if unknown.
    pub fn get_content_alias(&self, key: Uuid) -> String {
        self.content_keys
            .get(&key)
            .map(|alias| alias.clone())
            .unwrap_or_default()
    }

    // Property editor aliases

    /// Record how the editor alias of a content type property changes.
    ///
    /// Ignored if any of the four values is blank.
    pub fn add_content_property(
        &self,
        content_type_alias: &str,
        property_alias: &str,
        original_alias: &str,
        new_alias: &str,
    ) {
        if [content_type_alias, property_alias, original_alias, new_alias]
            .iter()
            .any(|value| is_blank(value))
        {
            return;
        }

        self.property_editor_aliases
            .entry((fold(content_type_alias), fold(property_alias)))
            .or_insert_with(|| EditorAliasInfo::new(original_alias, new_alias));
    }

    /// Editor alias pair for a property, resolved from its content type.
    ///
    /// When converting content the data type behind a property may already be
    /// replaced, so the answer comes from the content type: first the property
    /// on the type itself, then on each of its compositions in insertion
    /// order. Compositions of compositions are not followed. `None` means the
    /// caller should keep the property's alias as it is.
    pub fn get_editor_alias(
        &self,
        content_type_alias: &str,
        property_alias: &str,
    ) -> Option<EditorAliasInfo> {
        let property = fold(property_alias);

        if let Some(info) = self
            .property_editor_aliases
            .get(&(fold(content_type_alias), property.clone()))
        {
            return Some(info.clone());
        }

        self.get_content_type_compositions(content_type_alias)
            .iter()
            .find_map(|composition| {
                self.property_editor_aliases
                    .get(&(fold(composition), property.clone()))
                    .map(|info| info.clone())
            })
    }

    // Blocked items

    /// Check if an item is excluded from the migration.
    pub fn is_blocked(&self, item_type: &str, alias: &str) -> bool {
        self.blocked.contains(&(fold(item_type), fold(alias)))
    }

    /// Exclude an item of the given entity type from the migration.
    pub fn add_blocked(&self, item_type: &str, alias: &str) {
        self.blocked.insert((fold(item_type), fold(alias)));
    }

    /// Exclude a data type by key, after its alias or editor alias matched
    /// a block rule.
    pub fn add_blocked_data_type(&self, key: Uuid) {
        self.blocked_data_types.insert(key);
    }

    pub fn is_blocked_data_type(&self, key: Uuid) -> bool {
        self.blocked_data_types.contains(&key)
    }

    /// Record that a content type property uses a blocked data type.
    pub fn add_blocked_property(&self, content_type_alias: &str, property_alias: &str) {
        if is_blank(content_type_alias) || is_blank(property_alias) {
            return;
        }
        self.blocked_properties
            .insert((fold(content_type_alias), fold(property_alias)));
    }

    /// Check if a property uses a blocked data type, looking at the content
    /// type and then its compositions, one level deep.
    pub fn is_blocked_property(&self, content_type_alias: &str, property_alias: &str) -> bool {
        let property = fold(property_alias);
        if self
            .blocked_properties
            .contains(&(fold(content_type_alias), property.clone()))
        {
            return true;
        }

        self.get_content_type_compositions(content_type_alias)
            .iter()
            .any(|composition| {
                self.blocked_properties
                    .contains(&(fold(composition), property.clone()))
            })
    }

    // Ignored properties

    /// Ignore a property on one content type.
    ///
    /// Only the named content type is affected, not types composing it.
    pub fn add_ignored_property(&self, content_type_alias: &str, alias: &str) {
        self.ignored_properties
            .insert((fold(content_type_alias), fold(alias)));
    }

    /// Ignore a property on every content type.
    pub fn add_global_ignored_property(&self, alias: &str) {
        self.global_ignored_properties.insert(fold(alias));
    }

    /// Check if a property is ignored on the content type or globally.
    pub fn is_ignored_property(&self, content_type_alias: &str, alias: &str) -> bool {
        let alias = fold(alias);
        self.global_ignored_properties.contains(&alias)
            || self
                .ignored_properties
                .contains(&(fold(content_type_alias), alias))
    }

    // Data types

    /// Record the legacy editor alias of a data type.
    pub fn add_data_type_definition(&self, key: Uuid, editor_alias: &str) {
        self.data_type_definitions
            .entry(key)
            .or_insert_with(|| editor_alias.to_string());
    }

    /// Legacy editor alias of a data type, or an empty string if unknown.
    pub fn get_data_type_from_definition(&self, key: Uuid) -> String {
        self.data_type_definitions
            .get(&key)
            .map(|alias| alias.clone())
            .unwrap_or_default()
    }

    /// Record that `original` is replaced by `replacement`.
    pub fn add_replacement_data_type(&self, original: Uuid, replacement: Uuid) {
        self.data_type_replacements
            .entry(original)
            .or_insert(replacement);
    }

    /// Key of the data type replacing `original`, or `original` itself.
    pub fn get_replacement_data_type(&self, original: Uuid) -> Uuid {
        self.data_type_replacements
            .get(&original)
            .map(|key| *key)
            .unwrap_or(original)
    }

    /// Record the variation a data type imposes on its properties.
    pub fn add_data_type_variation(&self, key: Uuid, variation: Variation) {
        self.data_type_variations.entry(key).or_insert(variation);
    }

    /// Variation of a data type, or [`Variation::Nothing`] if unknown.
    pub fn get_data_type_variation(&self, key: Uuid) -> Variation {
        self.data_type_variations
            .get(&key)
            .map(|variation| *variation)
            .unwrap_or_default()
    }

    /// Snapshot of the table sizes.
    pub fn stats(&self) -> ContextStats {
        ContextStats {
            blocked_items: self.blocked.len(),
            blocked_data_types: self.blocked_data_types.len(),
            blocked_properties: self.blocked_properties.len(),
            ignored_properties: self.ignored_properties.len()
                + self.global_ignored_properties.len(),
            data_type_definitions: self.data_type_definitions.len(),
            data_type_replacements: self.data_type_replacements.len(),
            data_type_variations: self.data_type_variations.len(),
            content_keys: self.content_keys.len(),
            content_paths: self.content_paths.len(),
            content_type_keys: self.content_type_keys.len(),
            content_type_compositions: self.content_type_compositions.len(),
            property_editor_aliases: self.property_editor_aliases.len(),
            template_keys: self.template_keys.len(),
        }
    }
}

impl std::fmt::Debug for MigrationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationContext")
            .field("migration_id", &self.migration_id)
            .field("stats", &self.stats())
            .finish()
    }
}
