//! Migration error types.
//!
//! Missing references, malformed pre-values and duplicate inserts are not
//! errors: the context answers with sentinels and migrators treat bad values
//! as absent. Only conditions that should stop a run end up here.

use thiserror::Error;
use uuid::Uuid;

/// Errors that abort a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The migration options could not be resolved into a plan.
    #[error("invalid migration plan: {message}")]
    InvalidPlan {
        /// Description of the problem.
        message: String,
    },

    /// An entity type name did not match any known handler.
    #[error("unknown entity type: {name}")]
    UnknownEntityType {
        /// The name that failed to resolve.
        name: String,
    },

    /// Editor aliases without a migrator were found and the pipeline is
    /// configured to treat that as fatal.
    #[error("no migrator registered for editor aliases: {}", aliases.join(", "))]
    UnmappedEditors {
        /// The unmapped editor aliases, sorted.
        aliases: Vec<String>,
    },

    /// The run was cancelled through its cancellation token.
    #[error("migration {migration_id} cancelled")]
    Cancelled {
        /// The ID of the cancelled run.
        migration_id: Uuid,
    },

    /// The output writer failed.
    #[error("writer error: {0}")]
    Writer(#[from] WriterError),

    /// Plan document (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a [`MigrationWriter`](crate::pipeline::MigrationWriter).
#[derive(Debug, Error)]
pub enum WriterError {
    /// I/O failure in the underlying sink.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The sink refused the entity.
    #[error("entity {key} rejected: {reason}")]
    Rejected {
        /// Key of the rejected entity.
        key: Uuid,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_editors_display() {
        let err = MigrationError::UnmappedEditors {
            aliases: vec!["Custom.Grid".to_string(), "Our.Picker".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no migrator registered for editor aliases: Custom.Grid, Our.Picker"
        );
    }

    #[test]
    fn test_writer_error_converts() {
        let err: MigrationError = WriterError::Rejected {
            key: Uuid::nil(),
            reason: "read only".to_string(),
        }
        .into();
        assert!(matches!(err, MigrationError::Writer(_)));
        assert!(err.to_string().contains("read only"));
    }
}
