//! Writes migrated entities as JSON files.

use cmsmig_core::{EntityType, MigratedEntity, MigrationWriter, WriterError};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the output root for each entity type.
pub fn entity_dir(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::DataType => "data-types",
        EntityType::ContentType => "content-types",
        EntityType::Template => "templates",
        EntityType::Content => "content",
    }
}

/// One pretty-printed file per entity at `<root>/<type dir>/<key>.json`,
/// plus an `index.json` summary once the run finishes.
#[derive(Debug)]
pub struct JsonDirectoryWriter {
    root: PathBuf,
    written: BTreeMap<EntityType, usize>,
}

impl JsonDirectoryWriter {
    /// Create the writer, creating `root` if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, WriterError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            written: BTreeMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an entity is written to.
    pub fn path_for(&self, entity: &MigratedEntity) -> PathBuf {
        self.root
            .join(entity_dir(entity.entity_type()))
            .join(format!("{}.json", entity.key()))
    }

    pub fn written(&self) -> usize {
        self.written.values().sum()
    }
}

impl MigrationWriter for JsonDirectoryWriter {
    fn write(&mut self, entity: &MigratedEntity) -> Result<(), WriterError> {
        let path = self.path_for(entity);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(entity)?)?;
        tracing::debug!(path = %path.display(), alias = entity.alias(), "wrote entity");

        *self.written.entry(entity.entity_type()).or_default() += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriterError> {
        let counts: BTreeMap<&str, usize> = self
            .written
            .iter()
            .map(|(entity_type, count)| (entity_type.name(), *count))
            .collect();
        let index = json!({ "entities": counts, "total": self.written() });
        fs::write(self.root.join("index.json"), serde_json::to_vec_pretty(&index)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsmig_core::MigratedTemplate;
    use uuid::Uuid;

    #[test]
    fn test_writes_entity_files_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JsonDirectoryWriter::create(dir.path().join("out")).unwrap();

        let entity = MigratedEntity::Template(MigratedTemplate {
            key: Uuid::from_u128(7),
            alias: "Master".to_string(),
            master_key: None,
        });
        writer.write(&entity).unwrap();
        writer.finish().unwrap();

        let path = writer.path_for(&entity);
        assert!(path.starts_with(dir.path().join("out").join("templates")));

        let written: MigratedEntity =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, entity);

        let index: serde_json::Value =
            serde_json::from_slice(&fs::read(writer.root().join("index.json")).unwrap()).unwrap();
        assert_eq!(index["entities"]["Template"], 1);
        assert_eq!(index["total"], 1);
    }
}
