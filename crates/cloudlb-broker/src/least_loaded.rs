//! Greedy least-loaded dispatch.
//!
//! Each task goes to the worker with the smallest accumulated length at the
//! moment of the decision. Candidates are compared by `(load, pool index)`,
//! so equally loaded workers resolve to the one constructed first. The
//! [`Dispatcher`](crate::Dispatcher) charges the chosen worker before the
//! next task is considered, which is what keeps the policy from degenerating
//! into plain rotation.

use cloudlb_core::{Task, WorkerId};

use crate::error::{DispatchError, DispatchResult};
use crate::policy::DispatchPolicy;
use crate::pool::WorkerPool;
use crate::tracker::LoadTracker;

/// Stateless least-loaded selection over a [`LoadTracker`].
///
/// A linear scan per task is O(workers); worker counts are small, so the
/// whole pass is O(tasks × workers).
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastLoadedScheduler;

impl LeastLoadedScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Pool index and load of the minimum of `(load, index)`.
    pub fn least_loaded(tracker: &LoadTracker) -> Option<(usize, u64)> {
        (0..tracker.len())
            .filter_map(|index| tracker.load_at(index).map(|load| (load, index)))
            .min()
            .map(|(load, index)| (index, load))
    }
}

impl DispatchPolicy for LeastLoadedScheduler {
    fn name(&self) -> &'static str {
        "least-loaded"
    }

    fn select(
        &mut self,
        pool: &WorkerPool,
        tracker: &LoadTracker,
        _task: &Task,
    ) -> DispatchResult<WorkerId> {
        let (index, _) = Self::least_loaded(tracker).ok_or(DispatchError::NoWorkersAvailable)?;
        pool.list_workers()
            .get(index)
            .map(|w| w.id)
            .ok_or(DispatchError::NoWorkersAvailable)
    }
}
