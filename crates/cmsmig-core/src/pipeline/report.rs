//! Run report and the collector handlers feed while converting.

use super::state::{HandlerProgress, RunState, RunStatus};
use crate::context::ContextStats;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub migration_id: Uuid,
    pub status: RunStatus,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub handlers: Vec<HandlerProgress>,
    /// Editor aliases with no migrator and no fallback, sorted. Data types
    /// using them were skipped.
    pub unmapped_editors: Vec<String>,
    /// Editor aliases converted by the fallback migrator, sorted.
    pub fallback_editors: Vec<String>,
    /// Entities skipped because they, or their content type, were blocked.
    pub blocked: usize,
    /// Properties dropped because their data type was blocked.
    pub blocked_properties: usize,
    /// Properties dropped by ignore rules.
    pub ignored_properties: usize,
    /// Data types left out because another data type replaces them.
    pub replaced_data_types: usize,
    pub warnings: Vec<String>,
    /// Context table sizes after preparation.
    pub context: ContextStats,
}

impl MigrationReport {
    /// Total entities handed to the writer.
    pub fn migrated(&self) -> usize {
        self.handlers.iter().map(|progress| progress.migrated).sum()
    }

    /// Progress of one handler.
    pub fn handler(&self, entity_type: crate::model::EntityType) -> Option<&HandlerProgress> {
        self.handlers
            .iter()
            .find(|progress| progress.entity_type == entity_type)
    }

    pub fn is_clean(&self) -> bool {
        self.unmapped_editors.is_empty() && self.warnings.is_empty()
    }
}

#[derive(Debug, Default)]
struct Findings {
    /// Folded alias -> alias as first seen.
    unmapped: BTreeMap<String, String>,
    fallback: BTreeMap<String, String>,
    blocked: usize,
    blocked_properties: usize,
    ignored_properties: usize,
    replaced_data_types: usize,
    warnings: Vec<String>,
}

/// Thread-safe sink for what handlers notice during conversion.
#[derive(Debug, Default)]
pub struct ReportCollector {
    findings: Mutex<Findings>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an editor alias without a migrator.
    ///
    /// Returns true the first time an alias (case-insensitive) is seen.
    pub fn record_unmapped(&self, editor_alias: &str) -> bool {
        insert_once(&mut self.findings.lock().unmapped, editor_alias)
    }

    /// Record an editor alias handled by the fallback migrator.
    ///
    /// Returns true the first time an alias (case-insensitive) is seen.
    pub fn record_fallback(&self, editor_alias: &str) -> bool {
        insert_once(&mut self.findings.lock().fallback, editor_alias)
    }

    pub fn record_blocked(&self) {
        self.findings.lock().blocked += 1;
    }

    pub fn record_blocked_property(&self) {
        self.findings.lock().blocked_properties += 1;
    }

    pub fn record_ignored_property(&self) {
        self.findings.lock().ignored_properties += 1;
    }

    pub fn record_replaced(&self) {
        self.findings.lock().replaced_data_types += 1;
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.findings.lock().warnings.push(message.into());
    }

    /// Unmapped editor aliases so far, sorted.
    pub fn unmapped_editors(&self) -> Vec<String> {
        self.findings.lock().unmapped.values().cloned().collect()
    }

    /// Build the report for a run.
    pub fn finish(&self, state: &RunState, context: ContextStats) -> MigrationReport {
        let findings = self.findings.lock();
        MigrationReport {
            migration_id: state.migration_id,
            status: state.status,
            started_at: state.started_at,
            completed_at: state.completed_at,
            handlers: state.handlers.clone(),
            unmapped_editors: findings.unmapped.values().cloned().collect(),
            fallback_editors: findings.fallback.values().cloned().collect(),
            blocked: findings.blocked,
            blocked_properties: findings.blocked_properties,
            ignored_properties: findings.ignored_properties,
            replaced_data_types: findings.replaced_data_types,
            warnings: findings.warnings.clone(),
            context,
        }
    }
}

fn insert_once(seen: &mut BTreeMap<String, String>, alias: &str) -> bool {
    let folded = alias.to_lowercase();
    if seen.contains_key(&folded) {
        return false;
    }
    seen.insert(folded, alias.to_string());
    true
}
