//! Records read from a legacy export.
//!
//! The reader that produces these is outside the core; the records only carry
//! what the migration needs: identity, aliases, pre-values and references by
//! key or alias.

use super::{DatabaseType, PreValues};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A legacy data type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDataType {
    pub key: Uuid,
    /// Data type name.
    pub alias: String,
    /// Property editor that governs the data type.
    pub editor_alias: String,
    #[serde(default)]
    pub database_type: DatabaseType,
    #[serde(default)]
    pub pre_values: PreValues,
}

impl LegacyDataType {
    pub fn new(key: Uuid, alias: impl Into<String>, editor_alias: impl Into<String>) -> Self {
        Self {
            key,
            alias: alias.into(),
            editor_alias: editor_alias.into(),
            database_type: DatabaseType::default(),
            pre_values: PreValues::new(),
        }
    }

    pub fn with_database_type(mut self, database_type: DatabaseType) -> Self {
        self.database_type = database_type;
        self
    }

    pub fn with_pre_value(mut self, alias: impl Into<String>, value: impl Into<String>) -> Self {
        self.pre_values.push(alias, value);
        self
    }
}

/// A property defined on a legacy content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPropertyType {
    pub alias: String,
    #[serde(default)]
    pub name: String,
    /// Key of the data type backing the property.
    pub data_type_key: Uuid,
}

/// A legacy content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyContentType {
    pub key: Uuid,
    pub alias: String,
    /// Aliases of the content types this one is composed of.
    #[serde(default)]
    pub compositions: Vec<String>,
    #[serde(default)]
    pub properties: Vec<LegacyPropertyType>,
}

impl LegacyContentType {
    pub fn new(key: Uuid, alias: impl Into<String>) -> Self {
        Self {
            key,
            alias: alias.into(),
            compositions: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_composition(mut self, alias: impl Into<String>) -> Self {
        self.compositions.push(alias.into());
        self
    }

    pub fn with_property(mut self, alias: impl Into<String>, data_type_key: Uuid) -> Self {
        let alias = alias.into();
        self.properties.push(LegacyPropertyType {
            name: alias.clone(),
            alias,
            data_type_key,
        });
        self
    }
}

/// A legacy template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTemplate {
    pub key: Uuid,
    pub alias: String,
    /// Alias of the layout this template inherits from.
    #[serde(default)]
    pub master_alias: Option<String>,
}

impl LegacyTemplate {
    pub fn new(key: Uuid, alias: impl Into<String>) -> Self {
        Self {
            key,
            alias: alias.into(),
            master_alias: None,
        }
    }

    pub fn with_master(mut self, alias: impl Into<String>) -> Self {
        self.master_alias = Some(alias.into());
        self
    }
}

/// A stored property value on a legacy content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPropertyValue {
    pub alias: String,
    pub value: String,
}

/// A legacy content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyContent {
    pub key: Uuid,
    pub alias: String,
    pub content_type_alias: String,
    /// Key of the parent item; `None` for root items.
    #[serde(default)]
    pub parent_key: Option<Uuid>,
    #[serde(default)]
    pub template_alias: Option<String>,
    #[serde(default)]
    pub properties: Vec<LegacyPropertyValue>,
}

impl LegacyContent {
    pub fn new(key: Uuid, alias: impl Into<String>, content_type_alias: impl Into<String>) -> Self {
        Self {
            key,
            alias: alias.into(),
            content_type_alias: content_type_alias.into(),
            parent_key: None,
            template_alias: None,
            properties: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_key: Uuid) -> Self {
        self.parent_key = Some(parent_key);
        self
    }

    pub fn with_template(mut self, alias: impl Into<String>) -> Self {
        self.template_alias = Some(alias.into());
        self
    }

    pub fn with_value(mut self, alias: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(LegacyPropertyValue {
            alias: alias.into(),
            value: value.into(),
        });
        self
    }
}

/// Everything read from a legacy export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyExport {
    pub data_types: Vec<LegacyDataType>,
    pub content_types: Vec<LegacyContentType>,
    pub templates: Vec<LegacyTemplate>,
    pub content: Vec<LegacyContent>,
}

impl LegacyExport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_type(mut self, data_type: LegacyDataType) -> Self {
        self.data_types.push(data_type);
        self
    }

    pub fn with_content_type(mut self, content_type: LegacyContentType) -> Self {
        self.content_types.push(content_type);
        self
    }

    pub fn with_template(mut self, template: LegacyTemplate) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_content(mut self, content: LegacyContent) -> Self {
        self.content.push(content);
        self
    }

    /// Total number of records in the export.
    pub fn len(&self) -> usize {
        self.data_types.len() + self.content_types.len() + self.templates.len() + self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_deserializes_with_defaults() {
        let json = r#"{
            "dataTypes": [
                {
                    "key": "00000000-0000-0000-0000-000000000001",
                    "alias": "Numeric",
                    "editorAlias": "Umbraco.Integer",
                    "preValues": [{"alias": "min", "value": "1"}]
                }
            ],
            "content": [
                {
                    "key": "00000000-0000-0000-0000-000000000002",
                    "alias": "home",
                    "contentTypeAlias": "HomePage"
                }
            ]
        }"#;

        let export: LegacyExport = serde_json::from_str(json).unwrap();
        assert_eq!(export.len(), 2);
        assert!(export.templates.is_empty());
        assert_eq!(export.data_types[0].database_type, DatabaseType::Nvarchar);
        assert_eq!(export.data_types[0].pre_values.get_int("min"), Some(1));
        assert_eq!(export.content[0].parent_key, None);
    }
}
