//! Error types for the routing engine and its adapters.

use thiserror::Error;

/// Failure reported by a worker or task directory backend.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("directory backend failed: {0}")]
    Backend(String),
}

/// Failure while reading the travel cache.
///
/// Never escapes the travel metric provider: it is logged and the
/// estimate is used instead.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("travel cache request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("travel cache backend failed: {0}")]
    Backend(String),
}

/// Invalid or missing configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Text that does not describe a clock time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid clock time {0:?}, expected HH:MM or HH:MM:SS")]
pub struct ParseClockError(pub String);

/// Per-worker failure. The worker is skipped and the message is recorded in
/// the batch result; other workers are still processed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("Missing worker id in assignment")]
    MissingWorkerId,
    #[error("Worker {0} not found or missing coordinates")]
    WorkerNotFound(String),
    #[error("Malformed task id {task_id:?} for worker {worker_id}")]
    MalformedTaskId { worker_id: String, task_id: String },
    #[error("No valid tasks found for worker {0}")]
    NoValidTasks(String),
    #[error("Lookup failed for worker {worker_id}: {reason}")]
    Lookup { worker_id: String, reason: String },
}
