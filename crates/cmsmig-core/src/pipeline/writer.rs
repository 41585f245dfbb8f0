//! Output sink for migrated entities.

use crate::error::WriterError;
use crate::model::{EntityType, MigratedEntity};
use uuid::Uuid;

/// Receives every migrated entity, in pass order.
///
/// Implementations decide where entities go; the core never touches files.
pub trait MigrationWriter {
    fn write(&mut self, entity: &MigratedEntity) -> Result<(), WriterError>;

    /// Called once after the last entity of a successful run.
    fn finish(&mut self) -> Result<(), WriterError> {
        Ok(())
    }
}

/// Keeps every entity in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    entities: Vec<MigratedEntity>,
    finished: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[MigratedEntity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<MigratedEntity> {
        self.entities
    }

    pub fn of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &MigratedEntity> {
        self.entities
            .iter()
            .filter(move |entity| entity.entity_type() == entity_type)
    }

    pub fn find(&self, key: Uuid) -> Option<&MigratedEntity> {
        self.entities.iter().find(|entity| entity.key() == key)
    }

    /// Find an entity by type and alias (case-insensitive).
    pub fn find_alias(&self, entity_type: EntityType, alias: &str) -> Option<&MigratedEntity> {
        self.of_type(entity_type)
            .find(|entity| entity.alias().eq_ignore_ascii_case(alias))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl MigrationWriter for MemoryWriter {
    fn write(&mut self, entity: &MigratedEntity) -> Result<(), WriterError> {
        self.entities.push(entity.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), WriterError> {
        self.finished = true;
        Ok(())
    }
}
