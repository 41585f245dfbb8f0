//! Migration options, profiles and the resolved plan.
//!
//! [`MigrationOptions`] is the human-editable document that differentiates
//! one run from another: which handlers run, what is blocked and which
//! properties are dropped. It is resolved once per run into a
//! [`MigrationPlan`], which validates names and seeds the context.

use crate::context::MigrationContext;
use crate::error::MigrationError;
use crate::model::{EntityType, HandlerGroup};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default output location for migrations.
pub const DEFAULT_TARGET: &str = "migrations/default";

fn default_enabled() -> bool {
    true
}

/// Whether a handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerOption {
    /// Handler name, an [`EntityType`] name.
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl HandlerOption {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }

    pub fn for_entity(entity_type: EntityType, enabled: bool) -> Self {
        Self::new(entity_type.name(), enabled)
    }
}

/// Serializable description of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationOptions {
    /// Where the external writer puts the output.
    pub target: String,
    /// Handlers to run. An empty list runs every handler.
    pub handlers: Vec<HandlerOption>,
    /// Entity type name to aliases excluded from the migration.
    pub blocked_items: BTreeMap<String, Vec<String>>,
    /// Property aliases dropped from every content type.
    pub ignored_properties: Vec<String>,
    /// Content type alias to property aliases dropped on that type only.
    pub ignored_properties_by_content_type: BTreeMap<String, Vec<String>>,
}

impl MigrationOptions {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// List every handler, enabling the ones `enabled` accepts.
    pub fn with_handlers(mut self, enabled: impl Fn(EntityType) -> bool) -> Self {
        self.handlers = EntityType::ALL
            .into_iter()
            .map(|entity_type| HandlerOption::for_entity(entity_type, enabled(entity_type)))
            .collect();
        self
    }

    /// Enable only the handlers of one group.
    pub fn with_group(self, group: HandlerGroup) -> Self {
        self.with_handlers(|entity_type| entity_type.group() == group)
    }

    pub fn block(mut self, entity_type: EntityType, alias: impl Into<String>) -> Self {
        self.blocked_items
            .entry(entity_type.name().to_string())
            .or_default()
            .push(alias.into());
        self
    }

    pub fn ignore_property(mut self, alias: impl Into<String>) -> Self {
        self.ignored_properties.push(alias.into());
        self
    }

    pub fn ignore_property_on(
        mut self,
        content_type_alias: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.ignored_properties_by_content_type
            .entry(content_type_alias.into())
            .or_default()
            .push(alias.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, MigrationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, MigrationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A named, reusable set of options.
///
/// Hosts implement this to ship non-default behaviour without writing
/// migrator code.
pub trait MigrationProfile: Send + Sync {
    fn name(&self) -> &str;

    fn icon(&self) -> &str {
        "icon-settings"
    }

    fn description(&self) -> &str;

    fn options(&self) -> MigrationOptions;
}

/// Migrates everything with no exclusions.
#[derive(Debug, Default)]
pub struct DefaultProfile;

impl MigrationProfile for DefaultProfile {
    fn name(&self) -> &str {
        "Default"
    }

    fn description(&self) -> &str {
        "Migrate every data type, content type, template and content item"
    }

    fn options(&self) -> MigrationOptions {
        MigrationOptions::new(DEFAULT_TARGET).with_handlers(|_| true)
    }
}

/// Validated options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    target: String,
    enabled: BTreeSet<EntityType>,
    blocked: Vec<(EntityType, String)>,
    ignored_properties: Vec<String>,
    ignored_by_content_type: Vec<(String, String)>,
}

impl MigrationPlan {
    /// Validate options and resolve them into a plan.
    ///
    /// Handler and blocked-item names must be known entity types. When a
    /// handler is listed twice the first entry wins. Blank aliases are
    /// dropped.
    pub fn resolve(options: &MigrationOptions) -> Result<Self, MigrationError> {
        let enabled = if options.handlers.is_empty() {
            EntityType::ALL.into_iter().collect()
        } else {
            let mut seen = BTreeSet::new();
            let mut enabled = BTreeSet::new();
            for handler in &options.handlers {
                let entity_type = parse_entity_type(&handler.name, "handler")?;
                if seen.insert(entity_type) && handler.enabled {
                    enabled.insert(entity_type);
                }
            }
            enabled
        };

        let mut blocked = Vec::new();
        for (name, aliases) in &options.blocked_items {
            let entity_type = parse_entity_type(name, "blocked item type")?;
            blocked.extend(
                non_blank(aliases).map(|alias| (entity_type, alias.to_string())),
            );
        }

        let ignored_properties = non_blank(&options.ignored_properties)
            .map(str::to_string)
            .collect();

        let mut ignored_by_content_type = Vec::new();
        for (content_type, aliases) in &options.ignored_properties_by_content_type {
            if content_type.trim().is_empty() {
                continue;
            }
            ignored_by_content_type.extend(
                non_blank(aliases).map(|alias| (content_type.clone(), alias.to_string())),
            );
        }

        Ok(Self {
            target: options.target.clone(),
            enabled,
            blocked,
            ignored_properties,
            ignored_by_content_type,
        })
    }

    /// Resolve the options of a profile.
    pub fn from_profile(profile: &dyn MigrationProfile) -> Result<Self, MigrationError> {
        Self::resolve(&profile.options())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_enabled(&self, entity_type: EntityType) -> bool {
        self.enabled.contains(&entity_type)
    }

    /// Enabled handlers in pass order.
    pub fn enabled_handlers(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.enabled.iter().copied()
    }

    pub fn blocked(&self) -> &[(EntityType, String)] {
        &self.blocked
    }

    /// Seed the context with the plan's exclusions.
    pub fn apply(&self, context: &MigrationContext) {
        for (entity_type, alias) in &self.blocked {
            context.add_blocked(entity_type.name(), alias);
        }
        for alias in &self.ignored_properties {
            context.add_global_ignored_property(alias);
        }
        for (content_type, alias) in &self.ignored_by_content_type {
            context.add_ignored_property(content_type, alias);
        }
    }
}

fn parse_entity_type(name: &str, what: &str) -> Result<EntityType, MigrationError> {
    name.parse().map_err(|_| MigrationError::InvalidPlan {
        message: format!("unknown {what} '{name}'"),
    })
}

fn non_blank(aliases: &[String]) -> impl Iterator<Item = &str> {
    aliases
        .iter()
        .map(|alias| alias.trim())
        .filter(|alias| !alias.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Content only, with the exclusions a typical site needs.
    struct ContentOnlyProfile;

    impl MigrationProfile for ContentOnlyProfile {
        fn name(&self) -> &str {
            "Content only"
        }

        fn icon(&self) -> &str {
            "icon-cloud color-blue"
        }

        fn description(&self) -> &str {
            "Content with changes"
        }

        fn options(&self) -> MigrationOptions {
            MigrationOptions::new("migrations/content-only")
                .with_group(HandlerGroup::Content)
                .block(EntityType::DataType, "Custom.LegacyType")
                .block(EntityType::DataType, "My.BoxGrid.Things")
                .ignore_property("SeoMetaDescription")
                .ignore_property("Keywords")
                .ignore_property_on("HomePage", "SiteName")
                .ignore_property_on("HomePage", "GoogleAnalyticsCode")
        }
    }

    #[test]
    fn test_empty_handler_list_enables_everything() {
        let plan = MigrationPlan::resolve(&MigrationOptions::new("out")).unwrap();
        assert_eq!(plan.enabled_handlers().collect::<Vec<_>>(), EntityType::ALL.to_vec());
        assert_eq!(plan.target(), "out");
    }

    #[test]
    fn test_profile_enables_group_only() {
        let profile = ContentOnlyProfile;
        let plan = MigrationPlan::from_profile(&profile).unwrap();

        assert!(plan.is_enabled(EntityType::Content));
        assert!(!plan.is_enabled(EntityType::DataType));
        assert!(!plan.is_enabled(EntityType::ContentType));
        assert_eq!(profile.icon(), "icon-cloud color-blue");
    }

    #[test]
    fn test_apply_seeds_context() {
        let plan = MigrationPlan::from_profile(&ContentOnlyProfile).unwrap();
        let ctx = MigrationContext::new(Uuid::new_v4());
        plan.apply(&ctx);

        assert!(ctx.is_blocked("DataType", "Custom.LegacyType"));
        assert!(!ctx.is_blocked("DataType", "Other"));
        assert!(ctx.is_ignored_property("AnyType", "Keywords"));
        assert!(ctx.is_ignored_property("HomePage", "SiteName"));
        assert!(!ctx.is_ignored_property("TextPage", "SiteName"));
    }

    #[test]
    fn test_unknown_handler_is_rejected() {
        let mut options = MigrationOptions::new("out");
        options.handlers.push(HandlerOption::new("Macro", true));

        let err = MigrationPlan::resolve(&options).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidPlan { .. }));
        assert!(err.to_string().contains("Macro"));
    }

    #[test]
    fn test_unknown_blocked_type_is_rejected() {
        let mut options = MigrationOptions::new("out");
        options
            .blocked_items
            .insert("Dictionary".to_string(), vec!["Greeting".to_string()]);
        assert!(MigrationPlan::resolve(&options).is_err());
    }

    #[test]
    fn test_first_handler_entry_wins() {
        let mut options = MigrationOptions::new("out");
        options.handlers = vec![
            HandlerOption::new("content", false),
            HandlerOption::new("Content", true),
        ];
        let plan = MigrationPlan::resolve(&options).unwrap();
        assert!(!plan.is_enabled(EntityType::Content));
    }

    #[test]
    fn test_json_document() {
        let json = r#"{
            "target": "migrations/site",
            "handlers": [{"name": "DataType"}, {"name": "Content", "enabled": false}],
            "blockedItems": {"DataType": ["Custom.LegacyType", " "]},
            "ignoredProperties": ["Keywords"],
            "ignoredPropertiesByContentType": {"HomePage": ["SiteName"]}
        }"#;

        let options = MigrationOptions::from_json(json).unwrap();
        let plan = MigrationPlan::resolve(&options).unwrap();

        assert!(plan.is_enabled(EntityType::DataType));
        assert!(!plan.is_enabled(EntityType::Content));
        assert!(!plan.is_enabled(EntityType::Template));
        assert_eq!(plan.blocked().len(), 1);

        let round = MigrationOptions::from_json(&options.to_json_pretty().unwrap()).unwrap();
        assert_eq!(round, options);
    }

    #[test]
    fn test_default_profile() {
        let profile = DefaultProfile;
        let plan = MigrationPlan::from_profile(&profile).unwrap();
        assert_eq!(plan.target(), DEFAULT_TARGET);
        assert!(EntityType::ALL.iter().all(|entity_type| plan.is_enabled(*entity_type)));
    }
}
