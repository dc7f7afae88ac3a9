//! Scheduler error types.

use thiserror::Error;

/// Errors reported by scheduler control operations.
///
/// Only `start` can fail. `add` and `render` are defined to always succeed
/// from the caller's perspective; anomalies there are contained and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// `start` was called while the driver is already running.
    #[error("scheduler is already running")]
    AlreadyRunning,

    /// The scheduler was destroyed and cannot be restarted.
    #[error("scheduler has been destroyed")]
    Destroyed,

    /// The OS refused to spawn the driver thread.
    #[error("failed to spawn driver thread: {0}")]
    DriverSpawn(String),
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
