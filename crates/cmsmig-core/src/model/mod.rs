//! Legacy input records and migrated output records.

mod legacy;
mod migrated;
pub(crate) mod prevalues;

pub use legacy::{
    LegacyContent, LegacyContentType, LegacyDataType, LegacyExport, LegacyPropertyType,
    LegacyPropertyValue, LegacyTemplate,
};
pub use migrated::{
    CompositionRef, MigratedContent, MigratedContentType, MigratedDataType, MigratedEntity,
    MigratedPropertyType, MigratedPropertyValue, MigratedTemplate,
};
pub use prevalues::{PreValue, PreValues};

use crate::error::MigrationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The entity types a migration handles, in pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    DataType,
    ContentType,
    Template,
    Content,
}

/// Handler group, used by profiles to switch sets of handlers on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerGroup {
    /// Definitions: data types, content types, templates.
    Settings,
    /// Content items.
    Content,
}

impl EntityType {
    /// Every entity type, in the order both passes visit them.
    ///
    /// Data types come first because content type preparation reads their
    /// editor aliases, and content types before content because content
    /// conversion reads their keys and property renames.
    pub const ALL: [EntityType; 4] = [
        EntityType::DataType,
        EntityType::ContentType,
        EntityType::Template,
        EntityType::Content,
    ];

    /// Name used for handlers and blocked-item lists.
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::DataType => "DataType",
            EntityType::ContentType => "ContentType",
            EntityType::Template => "Template",
            EntityType::Content => "Content",
        }
    }

    pub fn group(&self) -> HandlerGroup {
        match self {
            EntityType::Content => HandlerGroup::Content,
            _ => HandlerGroup::Settings,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityType {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        EntityType::ALL
            .into_iter()
            .find(|entity_type| entity_type.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| MigrationError::UnknownEntityType {
                name: name.to_string(),
            })
    }
}

/// Storage type of a data type's values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    Integer,
    Decimal,
    Date,
    #[default]
    Nvarchar,
    Ntext,
}

impl DatabaseType {
    /// Value type name written into label configurations.
    pub fn value_type(&self) -> &'static str {
        match self {
            DatabaseType::Integer => "INT",
            DatabaseType::Decimal => "DECIMAL",
            DatabaseType::Date => "DATETIME",
            DatabaseType::Nvarchar => "STRING",
            DatabaseType::Ntext => "TEXT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_parse_is_case_insensitive() {
        assert_eq!("datatype".parse::<EntityType>().unwrap(), EntityType::DataType);
        assert_eq!(" Content ".parse::<EntityType>().unwrap(), EntityType::Content);
        assert!(matches!(
            "Macro".parse::<EntityType>(),
            Err(MigrationError::UnknownEntityType { .. })
        ));
    }

    #[test]
    fn test_entity_type_groups() {
        assert_eq!(EntityType::Content.group(), HandlerGroup::Content);
        assert_eq!(EntityType::Template.group(), HandlerGroup::Settings);
    }

    #[test]
    fn test_pass_order() {
        let mut sorted = EntityType::ALL;
        sorted.sort();
        assert_eq!(sorted, EntityType::ALL);
    }
}
