//! The fixed set of workers available to a batch.

use std::collections::HashSet;

use cloudlb_core::{Worker, WorkerId};

use crate::error::{DispatchError, DispatchResult};

/// Ordered, duplicate-free list of workers.
///
/// Construction order is the tie-break order used by every dispatch policy,
/// so it never changes after `new`.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Build a pool, rejecting duplicate worker ids.
    ///
    /// An empty pool is allowed here; dispatch refuses it with
    /// [`DispatchError::NoWorkersAvailable`].
    pub fn new(workers: Vec<Worker>) -> DispatchResult<Self> {
        let mut seen = HashSet::with_capacity(workers.len());
        for worker in &workers {
            if !seen.insert(worker.id) {
                return Err(DispatchError::DuplicateWorker(worker.id));
            }
        }
        Ok(Self { workers })
    }

    pub fn list_workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn get(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Construction index of a worker.
    pub fn position(&self, id: WorkerId) -> Option<usize> {
        self.workers.iter().position(|w| w.id == id)
    }
}
