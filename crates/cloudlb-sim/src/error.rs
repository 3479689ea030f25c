//! Simulation error types.

use cloudlb_broker::DispatchError;
use cloudlb_core::{ConfigError, TaskId, WorkerId};
use thiserror::Error;

/// Errors raised by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("assignment references worker {0} which is not hosted by this datacenter")]
    UnknownWorker(WorkerId),

    #[error("assignment references unknown task {0}")]
    UnknownTask(TaskId),

    #[error("worker {0} has a MIPS rating of zero")]
    ZeroMips(WorkerId),
}

/// Errors that abort a simulated batch.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("execution failed: {0}")]
    Engine(#[from] EngineError),
}

pub type SimResult<T> = Result<T, SimError>;
