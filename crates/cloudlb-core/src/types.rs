//! Shared types used across cloudlb crates.

use serde::{Deserialize, Serialize};

/// Identity of a worker (VM). Unique within a pool.
pub type WorkerId = u32;

/// Identity of a task (cloudlet). Sequence order is arrival order.
pub type TaskId = u64;

/// A virtual worker with a fixed processing capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    /// Processing rate of a single PE, in MIPS.
    pub mips: u32,
    pub pes: u32,
    pub ram_mb: u32,
    pub bw: u64,
    /// Image size in MB.
    pub size_mb: u64,
}

impl Worker {
    /// A single-PE worker with no memory or bandwidth demands.
    pub fn new(id: WorkerId, mips: u32) -> Self {
        Self {
            id,
            mips,
            pes: 1,
            ram_mb: 0,
            bw: 0,
            size_mb: 0,
        }
    }

    /// Aggregate processing rate across all PEs.
    pub fn total_mips(&self) -> f64 {
        f64::from(self.mips) * f64::from(self.pes)
    }
}

/// A unit of work submitted for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Amount of work in MI. Negative lengths are rejected at dispatch.
    pub length: i64,
    /// PEs requested for execution.
    pub pes: u32,
    pub file_size: u64,
    pub output_size: u64,
}

impl Task {
    pub fn new(id: TaskId, length: i64) -> Self {
        Self {
            id,
            length,
            pes: 1,
            file_size: 0,
            output_size: 0,
        }
    }

    pub fn with_sizes(mut self, file_size: u64, output_size: u64) -> Self {
        self.file_size = file_size;
        self.output_size = output_size;
        self
    }

    pub fn with_pes(mut self, pes: u32) -> Self {
        self.pes = pes;
        self
    }
}

/// A dispatch decision: `task_id` runs on `worker_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: TaskId,
    pub worker_id: WorkerId,
    /// Length charged to the worker's load.
    pub length: u64,
    /// Worker load observed when the decision was made.
    pub load_before: u64,
}

/// Terminal state of an executed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Success,
    Failed,
}

impl TaskStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failed => "FAILED",
        }
    }
}

/// Post-execution view of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub task_id: TaskId,
    /// Datacenter that executed the task.
    pub resource_id: u32,
    pub worker_id: WorkerId,
    pub cpu_time: f64,
    pub start_time: f64,
    pub finish_time: f64,
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_builder_sets_sizes() {
        let task = Task::new(3, 500).with_sizes(20, 30).with_pes(2);
        assert_eq!(task.id, 3);
        assert_eq!(task.length, 500);
        assert_eq!(task.file_size, 20);
        assert_eq!(task.output_size, 30);
        assert_eq!(task.pes, 2);
    }

    #[test]
    fn worker_total_mips_scales_with_pes() {
        let mut worker = Worker::new(0, 250);
        assert_eq!(worker.total_mips(), 250.0);
        worker.pes = 4;
        assert_eq!(worker.total_mips(), 1000.0);
    }

    #[test]
    fn status_serializes_in_report_form() {
        let json = serde_json::to_string(&TaskStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
        assert_eq!(TaskStatus::Failed.label(), "FAILED");
        assert!(!TaskStatus::Failed.is_success());
    }
}
