//! Dispatch policies and the batch dispatch loop.
//!
//! A [`DispatchPolicy`] only picks a worker. The [`Dispatcher`] owns the
//! sequential pass: it validates each task, asks the policy, emits the
//! [`Assignment`] and charges the tracker before the next task is looked at.

use cloudlb_core::{Assignment, PolicyKind, Task, TaskId, WorkerId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DispatchError, DispatchResult};
use crate::least_loaded::LeastLoadedScheduler;
use crate::load_balancer::RoundRobinBalancer;
use crate::pool::WorkerPool;
use crate::tracker::{LoadTracker, WorkerLoad};

/// Chooses the worker for a single task.
pub trait DispatchPolicy {
    fn name(&self) -> &'static str;

    /// Clear per-pass state. Called once before the first task of a pass.
    fn begin_pass(&mut self) {}

    /// Pick the worker that receives `task`.
    ///
    /// Only called with a non-empty pool and a tracker initialized from it.
    fn select(
        &mut self,
        pool: &WorkerPool,
        tracker: &LoadTracker,
        task: &Task,
    ) -> DispatchResult<WorkerId>;
}

impl<P: DispatchPolicy + ?Sized> DispatchPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn begin_pass(&mut self) {
        (**self).begin_pass()
    }

    fn select(
        &mut self,
        pool: &WorkerPool,
        tracker: &LoadTracker,
        task: &Task,
    ) -> DispatchResult<WorkerId> {
        (**self).select(pool, tracker, task)
    }
}

/// Instantiate the policy named in configuration.
pub fn policy_for(kind: PolicyKind) -> Box<dyn DispatchPolicy> {
    match kind {
        PolicyKind::LeastLoaded => Box::new(LeastLoadedScheduler::new()),
        PolicyKind::RoundRobin => Box::new(RoundRobinBalancer::new()),
    }
}

/// A task rejected by the dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTask {
    pub task_id: TaskId,
    pub length: i64,
}

impl SkippedTask {
    pub fn error(&self) -> DispatchError {
        DispatchError::InvalidTaskLength {
            task_id: self.task_id,
            length: self.length,
        }
    }
}

/// Everything a dispatch pass produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub policy: String,
    /// One assignment per accepted task, in arrival order.
    pub assignments: Vec<Assignment>,
    pub skipped: Vec<SkippedTask>,
    /// Loads after the pass, in pool order.
    pub final_loads: Vec<WorkerLoad>,
}

impl DispatchOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Sum of the final loads, widened past `u64` so it cannot overflow.
    pub fn total_assigned_length(&self) -> u128 {
        self.final_loads.iter().map(|l| u128::from(l.load)).sum()
    }

    pub fn max_load(&self) -> u64 {
        self.final_loads.iter().map(|l| l.load).max().unwrap_or(0)
    }

    pub fn min_load(&self) -> u64 {
        self.final_loads.iter().map(|l| l.load).min().unwrap_or(0)
    }

    pub fn load_of(&self, worker: WorkerId) -> Option<u64> {
        self.final_loads
            .iter()
            .find(|l| l.worker_id == worker)
            .map(|l| l.load)
    }

    /// Assignments that landed on `worker`, in arrival order.
    pub fn assignments_for(&self, worker: WorkerId) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.worker_id == worker)
    }
}

/// Runs a policy over a whole batch.
pub struct Dispatcher<P> {
    policy: P,
}

impl<P: DispatchPolicy> Dispatcher<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Dispatch `tasks` in order onto `pool`.
    ///
    /// Fails with [`DispatchError::NoWorkersAvailable`] before touching any
    /// task when the pool is empty. Tasks with a negative length are skipped
    /// and reported in [`DispatchOutcome::skipped`].
    pub fn dispatch(&mut self, pool: &WorkerPool, tasks: &[Task]) -> DispatchResult<DispatchOutcome> {
        if pool.is_empty() {
            return Err(DispatchError::NoWorkersAvailable);
        }

        self.policy.begin_pass();
        let policy = self.policy.name();
        let mut tracker = LoadTracker::initialize(pool);
        let mut assignments = Vec::with_capacity(tasks.len());
        let mut skipped = Vec::new();

        for task in tasks {
            let Ok(length) = u64::try_from(task.length) else {
                let rejected = SkippedTask {
                    task_id: task.id,
                    length: task.length,
                };
                warn!(error = %rejected.error(), "skipping task");
                skipped.push(rejected);
                continue;
            };

            let worker_id = self.policy.select(pool, &tracker, task)?;
            let load_before = tracker.current_load(worker_id)?;

            assignments.push(Assignment {
                task_id: task.id,
                worker_id,
                length,
                load_before,
            });
            let load_after = tracker.record_assignment(worker_id, length)?;

            debug!(
                task = task.id,
                worker = worker_id,
                length,
                load_before,
                load_after,
                "submitted task to worker"
            );
        }

        info!(
            policy,
            dispatched = assignments.len(),
            skipped = skipped.len(),
            total_length = tracker.total_load(),
            "batch dispatched"
        );

        Ok(DispatchOutcome {
            policy: policy.to_string(),
            assignments,
            skipped,
            final_loads: tracker.loads(),
        })
    }
}
