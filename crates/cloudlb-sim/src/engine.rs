//! Task execution on worker timelines.
//!
//! The engine receives the broker's assignments after dispatch is complete
//! and plays each worker's queue forward in simulated time. Workers are
//! independent, so each one is simulated in isolation from its submission
//! time until its last task finishes.

use std::collections::HashMap;

use cloudlb_core::{Assignment, ExecutionModel, ResultRecord, Task, TaskId, TaskStatus, Worker, WorkerId};
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// Remaining work below this many MI counts as done.
const EPSILON_MI: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Pending {
    task_id: TaskId,
    length: f64,
    pes: u32,
}

/// Executes submitted tasks under one [`ExecutionModel`].
#[derive(Debug)]
pub struct ExecutionEngine {
    resource_id: u32,
    model: ExecutionModel,
    submission_time: f64,
    workers: Vec<Worker>,
    queues: Vec<Vec<Pending>>,
    index: HashMap<WorkerId, usize>,
}

impl ExecutionEngine {
    /// Fails with [`EngineError::ZeroMips`] if any worker cannot make progress.
    pub fn new(
        resource_id: u32,
        model: ExecutionModel,
        submission_time: f64,
        workers: &[Worker],
    ) -> Result<Self, EngineError> {
        if let Some(stalled) = workers.iter().find(|w| w.mips == 0) {
            return Err(EngineError::ZeroMips(stalled.id));
        }
        Ok(Self {
            resource_id,
            model,
            submission_time,
            workers: workers.to_vec(),
            queues: vec![Vec::new(); workers.len()],
            index: workers.iter().enumerate().map(|(i, w)| (w.id, i)).collect(),
        })
    }

    /// Enqueue `task` on the worker named by `assignment`.
    pub fn submit(&mut self, assignment: &Assignment, task: &Task) -> Result<(), EngineError> {
        let slot = *self
            .index
            .get(&assignment.worker_id)
            .ok_or(EngineError::UnknownWorker(assignment.worker_id))?;
        self.queues[slot].push(Pending {
            task_id: task.id,
            length: assignment.length as f64,
            pes: task.pes.max(1),
        });
        Ok(())
    }

    /// Submit a whole assignment stream, resolving tasks by id.
    pub fn submit_all(&mut self, assignments: &[Assignment], tasks: &[Task]) -> Result<(), EngineError> {
        let by_id: HashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
        for assignment in assignments {
            let task = by_id
                .get(&assignment.task_id)
                .ok_or(EngineError::UnknownTask(assignment.task_id))?;
            self.submit(assignment, task)?;
        }
        Ok(())
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queues.iter().map(Vec::len).sum()
    }

    /// Run every worker to completion. Records come out grouped by worker.
    pub fn run(self) -> Vec<ResultRecord> {
        let mut records = Vec::with_capacity(self.pending());

        for (worker, queue) in self.workers.iter().zip(self.queues) {
            if queue.is_empty() {
                continue;
            }
            let mut timeline = WorkerTimeline {
                worker,
                resource_id: self.resource_id,
                start: self.submission_time,
                records: Vec::with_capacity(queue.len()),
            };
            let runnable = timeline.reject_oversized(queue);
            match self.model {
                ExecutionModel::TimeShared => timeline.time_shared(runnable),
                ExecutionModel::SpaceShared => timeline.space_shared(runnable),
            }

            let finish = timeline
                .records
                .iter()
                .map(|r| r.finish_time)
                .fold(self.submission_time, f64::max);
            info!(
                worker = worker.id,
                model = %self.model,
                tasks = timeline.records.len(),
                finish,
                "worker drained"
            );
            records.extend(timeline.records);
        }

        records
    }
}

struct WorkerTimeline<'a> {
    worker: &'a Worker,
    resource_id: u32,
    start: f64,
    records: Vec<ResultRecord>,
}

impl WorkerTimeline<'_> {
    fn record(&mut self, task_id: TaskId, start: f64, finish: f64, status: TaskStatus) {
        debug!(task = task_id, worker = self.worker.id, start, finish, "task finished");
        self.records.push(ResultRecord {
            task_id,
            resource_id: self.resource_id,
            worker_id: self.worker.id,
            cpu_time: finish - start,
            start_time: start,
            finish_time: finish,
            status,
        });
    }

    /// Tasks asking for more PEs than the worker has fail at submission.
    fn reject_oversized(&mut self, queue: Vec<Pending>) -> Vec<Pending> {
        let (runnable, oversized): (Vec<_>, Vec<_>) =
            queue.into_iter().partition(|p| p.pes <= self.worker.pes);
        for p in oversized {
            warn!(task = p.task_id, worker = self.worker.id, pes = p.pes, "task needs more PEs than worker has");
            self.record(p.task_id, self.start, self.start, TaskStatus::Failed);
        }
        runnable
    }

    /// Processor sharing: every active task progresses at once.
    ///
    /// While the requested PEs fit the worker each task runs at full per-PE
    /// speed; beyond that the worker's total capacity is split evenly over
    /// all requested PEs.
    fn time_shared(&mut self, queue: Vec<Pending>) {
        let mips = f64::from(self.worker.mips);
        let worker_pes = self.worker.pes;
        let mut active = queue;
        let mut now = self.start;

        while !active.is_empty() {
            let requested: u32 = active.iter().map(|p| p.pes).sum();
            let per_pe = if requested <= worker_pes {
                mips
            } else {
                mips * f64::from(worker_pes) / f64::from(requested)
            };

            let (next, dt) = active
                .iter()
                .enumerate()
                .map(|(i, p)| (i, p.length / (per_pe * f64::from(p.pes))))
                .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best });

            now += dt;
            for (i, p) in active.iter_mut().enumerate() {
                if i == next {
                    p.length = 0.0;
                } else {
                    p.length -= per_pe * f64::from(p.pes) * dt;
                }
            }

            let (done, rest): (Vec<_>, Vec<_>) = active.into_iter().partition(|p| p.length <= EPSILON_MI);
            for p in done {
                self.record(p.task_id, self.start, now, TaskStatus::Success);
            }
            active = rest;
        }
    }

    /// FIFO: a task starts once enough PEs are free and keeps them until it
    /// finishes.
    fn space_shared(&mut self, queue: Vec<Pending>) {
        let mips = f64::from(self.worker.mips);
        let mut waiting = queue.into_iter();
        let mut head = waiting.next();
        // (task_id, start, finish, pes)
        let mut running: Vec<(TaskId, f64, f64, u32)> = Vec::new();
        let mut free_pes = self.worker.pes;
        let mut now = self.start;

        loop {
            while let Some(p) = head.take() {
                if p.pes > free_pes {
                    head = Some(p);
                    break;
                }
                free_pes -= p.pes;
                let finish = now + p.length / (mips * f64::from(p.pes));
                running.push((p.task_id, now, finish, p.pes));
                head = waiting.next();
            }

            let Some(next) = running
                .iter()
                .enumerate()
                .fold(None, |best: Option<usize>, (i, r)| match best {
                    Some(b) if running[b].2 <= r.2 => Some(b),
                    _ => Some(i),
                })
            else {
                break;
            };

            let (task_id, start, finish, pes) = running.remove(next);
            now = finish;
            free_pes += pes;
            self.record(task_id, start, finish, TaskStatus::Success);
        }
    }
}
