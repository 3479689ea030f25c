//! Gathers completed-task records into a report ordered by task id.

use std::collections::BTreeMap;

use cloudlb_core::{ResultRecord, WorkerId};
use serde::{Deserialize, Serialize};

/// Accumulates [`ResultRecord`]s in whatever order execution produced them.
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    records: Vec<ResultRecord>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the collector, sorting rows by task id.
    pub fn report(mut self) -> Report {
        self.records.sort_by_key(|r| r.task_id);
        Report { rows: self.records }
    }
}

impl Extend<ResultRecord> for ResultCollector {
    fn extend<I: IntoIterator<Item = ResultRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl FromIterator<ResultRecord> for ResultCollector {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Per-worker aggregate of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub worker_id: WorkerId,
    pub tasks: usize,
    pub cpu_time: f64,
    pub last_finish: f64,
}

/// Completed tasks of one batch, sorted by task id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ResultRecord>,
}

impl Report {
    /// Latest finish time across all rows, 0 for an empty report.
    pub fn makespan(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.finish_time)
            .fold(0.0, f64::max)
    }

    pub fn success_count(&self) -> usize {
        self.rows.iter().filter(|r| r.status.is_success()).count()
    }

    /// Summaries ordered by worker id.
    pub fn worker_summaries(&self) -> Vec<WorkerSummary> {
        let mut by_worker: BTreeMap<WorkerId, WorkerSummary> = BTreeMap::new();
        for row in &self.rows {
            let entry = by_worker.entry(row.worker_id).or_insert(WorkerSummary {
                worker_id: row.worker_id,
                tasks: 0,
                cpu_time: 0.0,
                last_finish: 0.0,
            });
            entry.tasks += 1;
            entry.cpu_time += row.cpu_time;
            entry.last_finish = entry.last_finish.max(row.finish_time);
        }
        by_worker.into_values().collect()
    }
}
