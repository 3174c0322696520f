//! Error types for the storage, alarm service and scheduler layers.
//!
//! Formatting and chart code never fails: it reports bad input through
//! sentinel values instead.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the durable key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by the OS alarm service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlarmServiceError {
    #[error("Exact alarm permission denied")]
    PermissionDenied,

    #[error("Alarm service rejected request {request_id}: {reason}")]
    Rejected { request_id: i32, reason: String },
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Alarm storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Alarm service error: {0}")]
    AlarmService(#[from] AlarmServiceError),
}
