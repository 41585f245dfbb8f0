//! Records produced by the conversion pass.

use super::{DatabaseType, EntityType};
use crate::context::Variation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A migrated data type with its new configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedDataType {
    pub key: Uuid,
    pub alias: String,
    pub editor_alias: String,
    pub database_type: DatabaseType,
    /// Editor-specific configuration.
    pub config: Value,
}

/// A composition reference resolved to the composed type's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionRef {
    pub alias: String,
    pub key: Uuid,
}

/// A migrated content type property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedPropertyType {
    pub alias: String,
    pub name: String,
    /// Key of the data type after replacements.
    pub data_type_key: Uuid,
    pub editor_alias: String,
    pub variation: Variation,
}

/// A migrated content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedContentType {
    pub key: Uuid,
    pub alias: String,
    /// Union of the property variations.
    pub variation: Variation,
    pub compositions: Vec<CompositionRef>,
    pub properties: Vec<MigratedPropertyType>,
}

/// A migrated template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedTemplate {
    pub key: Uuid,
    pub alias: String,
    pub master_key: Option<Uuid>,
}

/// A property value on a migrated content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedPropertyValue {
    pub alias: String,
    /// Editor alias after migration, when the content type knows it.
    pub editor_alias: Option<String>,
    pub value: Option<String>,
}

/// A migrated content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedContent {
    pub key: Uuid,
    pub alias: String,
    pub content_type_alias: String,
    pub content_type_key: Uuid,
    pub parent_key: Option<Uuid>,
    pub path: String,
    pub template_key: Option<Uuid>,
    pub properties: Vec<MigratedPropertyValue>,
}

impl MigratedContent {
    /// Value of a property by alias (case-insensitive).
    pub fn value(&self, alias: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.alias.eq_ignore_ascii_case(alias))
            .and_then(|property| property.value.as_deref())
    }
}

/// Any migrated entity, as handed to a writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityType")]
pub enum MigratedEntity {
    DataType(MigratedDataType),
    ContentType(MigratedContentType),
    Template(MigratedTemplate),
    Content(MigratedContent),
}

impl MigratedEntity {
    pub fn key(&self) -> Uuid {
        match self {
            MigratedEntity::DataType(entity) => entity.key,
            MigratedEntity::ContentType(entity) => entity.key,
            MigratedEntity::Template(entity) => entity.key,
            MigratedEntity::Content(entity) => entity.key,
        }
    }

    pub fn alias(&self) -> &str {
        match self {
            MigratedEntity::DataType(entity) => &entity.alias,
            MigratedEntity::ContentType(entity) => &entity.alias,
            MigratedEntity::Template(entity) => &entity.alias,
            MigratedEntity::Content(entity) => &entity.alias,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            MigratedEntity::DataType(_) => EntityType::DataType,
            MigratedEntity::ContentType(_) => EntityType::ContentType,
            MigratedEntity::Template(_) => EntityType::Template,
            MigratedEntity::Content(_) => EntityType::Content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_serializes_with_type_tag() {
        let entity = MigratedEntity::Template(MigratedTemplate {
            key: Uuid::from_u128(7),
            alias: "Master".to_string(),
            master_key: None,
        });

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["entityType"], "Template");
        assert_eq!(json["alias"], "Master");
        assert_eq!(entity.entity_type(), EntityType::Template);
        assert_eq!(entity.key(), Uuid::from_u128(7));
    }
}
