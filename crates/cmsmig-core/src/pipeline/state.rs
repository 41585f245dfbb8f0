//! Run and handler progress.
//!
//! Tracks where a run is and what each handler did, for the final report and
//! for status logging.

use crate::model::EntityType;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Microseconds since the Unix epoch.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_micros() as u64)
        .unwrap_or(0)
}

/// State of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run created but not started.
    Pending,
    /// First pass in progress.
    Preparing,
    /// Second pass in progress.
    Converting,
    /// Run completed successfully.
    Complete,
    /// Run failed.
    Failed,
    /// Run was cancelled.
    Cancelled,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Preparing => write!(f, "preparing"),
            RunStatus::Converting => write!(f, "converting"),
            RunStatus::Complete => write!(f, "complete"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Status of a single handler within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Prepared, conversion not reached yet.
    Pending,
    /// Converting and writing entities.
    InProgress,
    /// Every entity converted and handed to the writer.
    Complete,
    /// Conversion or writing returned an error.
    Failed,
    /// Disabled by the plan; only the preparation step ran.
    Skipped,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Pending => f.write_str("pending"),
            StepStatus::InProgress => f.write_str("converting"),
            StepStatus::Complete => f.write_str("complete"),
            StepStatus::Failed => f.write_str("failed"),
            StepStatus::Skipped => f.write_str("disabled"),
        }
    }
}

/// What one handler did during the conversion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerProgress {
    pub entity_type: EntityType,
    pub status: StepStatus,
    /// Entities read from the export.
    pub processed: usize,
    /// Entities handed to the writer.
    pub migrated: usize,
    /// Entities left out (blocked, replaced or unmapped).
    pub skipped: usize,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub error: Option<String>,
}

impl HandlerProgress {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            status: StepStatus::Pending,
            processed: 0,
            migrated: 0,
            skipped: 0,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.status = StepStatus::InProgress;
        self.started_at = Some(current_timestamp());
    }

    pub fn complete(&mut self, processed: usize, migrated: usize, skipped: usize) {
        self.status = StepStatus::Complete;
        self.completed_at = Some(current_timestamp());
        self.processed = processed;
        self.migrated = migrated;
        self.skipped = skipped;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = StepStatus::Failed;
        self.completed_at = Some(current_timestamp());
        self.error = Some(error.into());
    }

    pub fn skip(&mut self) {
        self.status = StepStatus::Skipped;
        self.completed_at = Some(current_timestamp());
    }

    /// Duration in microseconds, once finished.
    pub fn elapsed_micros(&self) -> Option<u64> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => Some(completed.saturating_sub(started)),
            _ => None,
        }
    }
}

/// Progress of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub migration_id: Uuid,
    pub status: RunStatus,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub error: Option<String>,
    /// One entry per handler, in pass order.
    pub handlers: Vec<HandlerProgress>,
}

impl RunState {
    pub fn new(migration_id: Uuid, entity_types: impl IntoIterator<Item = EntityType>) -> Self {
        Self {
            migration_id,
            status: RunStatus::Pending,
            started_at: None,
            completed_at: None,
            error: None,
            handlers: entity_types.into_iter().map(HandlerProgress::new).collect(),
        }
    }

    /// Start the preparation pass.
    pub fn start(&mut self) {
        self.status = RunStatus::Preparing;
        self.started_at = Some(current_timestamp());
    }

    /// Transition to the conversion pass.
    pub fn start_converting(&mut self) {
        self.status = RunStatus::Converting;
    }

    pub fn complete(&mut self) {
        self.status = RunStatus::Complete;
        self.completed_at = Some(current_timestamp());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = RunStatus::Failed;
        self.completed_at = Some(current_timestamp());
        self.error = Some(error.into());
    }

    pub fn cancel(&mut self) {
        self.status = RunStatus::Cancelled;
        self.completed_at = Some(current_timestamp());
    }

    pub fn handler_mut(&mut self, entity_type: EntityType) -> Option<&mut HandlerProgress> {
        self.handlers
            .iter_mut()
            .find(|progress| progress.entity_type == entity_type)
    }

    /// Check if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            RunStatus::Complete | RunStatus::Failed | RunStatus::Cancelled
        )
    }
}
