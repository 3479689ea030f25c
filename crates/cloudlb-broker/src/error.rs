//! Dispatch error types.

use cloudlb_core::{TaskId, WorkerId};
use thiserror::Error;

/// Errors that can occur while dispatching a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The pool was empty when the batch started. Nothing was dispatched.
    #[error("no workers available for dispatch")]
    NoWorkersAvailable,

    /// A worker id that is not part of the pool reached the load tracker.
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),

    /// A task carried a negative length. Only that task is skipped.
    #[error("task {task_id} has invalid length {length}")]
    InvalidTaskLength { task_id: TaskId, length: i64 },

    #[error("duplicate worker in pool: {0}")]
    DuplicateWorker(WorkerId),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
