//! Store error type.

use quickwin_core::TaskId;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("priority must be between 1 and 5 (got {0})")]
    PriorityOutOfRange(i64),

    #[error("duration must be positive (got {0})")]
    NonPositiveDuration(i64),

    #[error("duration of {0} minutes is too long")]
    DurationTooLong(i64),

    #[error("task #{0} not found")]
    NotFound(TaskId),

    #[error("no task ids left to allocate")]
    IdsExhausted,

    #[error("task #{0} appears more than once in the task file")]
    DuplicateId(TaskId),

    #[error("stored task #{id} is invalid: {source}")]
    InvalidRecord {
        id: TaskId,
        #[source]
        source: Box<StoreError>,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed task file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
