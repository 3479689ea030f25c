//! Round-robin dispatch.
//!
//! Cycles through pool indices regardless of load. This is the broker's
//! behaviour when no load estimate is consulted, and serves as the baseline
//! that least-loaded dispatch is compared against.

use cloudlb_core::{Task, WorkerId};

use crate::error::{DispatchError, DispatchResult};
use crate::policy::DispatchPolicy;
use crate::pool::WorkerPool;
use crate::tracker::LoadTracker;

/// Hands out pool indices in rotation, starting from index 0 on every pass.
#[derive(Debug, Clone, Default)]
pub struct RoundRobinBalancer {
    cursor: usize,
}

impl RoundRobinBalancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next index below `count`, or `None` for an empty pool.
    pub fn next(&mut self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let index = self.cursor % count;
        self.cursor = index + 1;
        Some(index)
    }
}

impl DispatchPolicy for RoundRobinBalancer {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn begin_pass(&mut self) {
        self.cursor = 0;
    }

    fn select(
        &mut self,
        pool: &WorkerPool,
        _tracker: &LoadTracker,
        _task: &Task,
    ) -> DispatchResult<WorkerId> {
        let index = self
            .next(pool.len())
            .ok_or(DispatchError::NoWorkersAvailable)?;
        pool.list_workers()
            .get(index)
            .map(|w| w.id)
            .ok_or(DispatchError::NoWorkersAvailable)
    }
}
