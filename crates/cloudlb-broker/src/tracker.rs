//! Running load estimate per worker.

use std::collections::HashMap;

use cloudlb_core::WorkerId;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};
use crate::pool::WorkerPool;

/// Accumulated length of everything assigned to one worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadRecord {
    pub total_assigned_length: u64,
}

/// Final load of a worker after a dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerLoad {
    pub worker_id: WorkerId,
    pub load: u64,
}

/// Owns the per-worker [`LoadRecord`]s of a dispatch pass.
///
/// Records are stored in pool order so policies can scan them by index.
#[derive(Debug, Clone)]
pub struct LoadTracker {
    ids: Vec<WorkerId>,
    records: Vec<LoadRecord>,
    index: HashMap<WorkerId, usize>,
}

impl LoadTracker {
    /// One zeroed record per pool worker.
    pub fn initialize(pool: &WorkerPool) -> Self {
        let ids: Vec<WorkerId> = pool.list_workers().iter().map(|w| w.id).collect();
        let index = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self {
            records: vec![LoadRecord::default(); ids.len()],
            ids,
            index,
        }
    }

    fn slot(&self, worker: WorkerId) -> DispatchResult<usize> {
        self.index
            .get(&worker)
            .copied()
            .ok_or(DispatchError::UnknownWorker(worker))
    }

    pub fn current_load(&self, worker: WorkerId) -> DispatchResult<u64> {
        let slot = self.slot(worker)?;
        Ok(self.records[slot].total_assigned_length)
    }

    /// Add `length` to the worker's accumulator and return the new load.
    pub fn record_assignment(&mut self, worker: WorkerId, length: u64) -> DispatchResult<u64> {
        let slot = self.slot(worker)?;
        let record = &mut self.records[slot];
        record.total_assigned_length = record.total_assigned_length.saturating_add(length);
        Ok(record.total_assigned_length)
    }

    /// Load of the worker at pool index `index`.
    pub fn load_at(&self, index: usize) -> Option<u64> {
        self.records.get(index).map(|r| r.total_assigned_length)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current loads in pool order.
    pub fn loads(&self) -> Vec<WorkerLoad> {
        self.ids
            .iter()
            .zip(&self.records)
            .map(|(id, record)| WorkerLoad {
                worker_id: *id,
                load: record.total_assigned_length,
            })
            .collect()
    }

    /// Sum of all loads. Widened so saturated workers still add up.
    pub fn total_load(&self) -> u128 {
        self.records
            .iter()
            .map(|r| u128::from(r.total_assigned_length))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudlb_core::Worker;

    fn pool(ids: &[WorkerId]) -> WorkerPool {
        WorkerPool::new(ids.iter().map(|id| Worker::new(*id, 250)).collect()).unwrap()
    }

    #[test]
    fn starts_at_zero() {
        let tracker = LoadTracker::initialize(&pool(&[0, 1, 2]));
        assert_eq!(tracker.len(), 3);
        for id in 0..3 {
            assert_eq!(tracker.current_load(id), Ok(0));
        }
        assert_eq!(tracker.total_load(), 0);
    }

    #[test]
    fn record_assignment_accumulates() {
        let mut tracker = LoadTracker::initialize(&pool(&[10, 20]));

        assert_eq!(tracker.record_assignment(20, 5), Ok(5));
        assert_eq!(tracker.record_assignment(20, 7), Ok(12));
        assert_eq!(tracker.record_assignment(10, 1), Ok(1));

        assert_eq!(tracker.current_load(20), Ok(12));
        assert_eq!(tracker.load_at(0), Some(1));
        assert_eq!(tracker.load_at(1), Some(12));
        assert_eq!(tracker.total_load(), 13);
    }

    #[test]
    fn unknown_worker_is_rejected() {
        let mut tracker = LoadTracker::initialize(&pool(&[0]));
        assert_eq!(
            tracker.record_assignment(9, 1),
            Err(DispatchError::UnknownWorker(9))
        );
        assert_eq!(tracker.current_load(9), Err(DispatchError::UnknownWorker(9)));
        assert_eq!(tracker.total_load(), 0);
    }

    #[test]
    fn zero_length_leaves_load_unchanged() {
        let mut tracker = LoadTracker::initialize(&pool(&[0]));
        tracker.record_assignment(0, 4).unwrap();
        assert_eq!(tracker.record_assignment(0, 0), Ok(4));
    }

    #[test]
    fn huge_lengths_saturate_without_overflowing_total() {
        let mut tracker = LoadTracker::initialize(&pool(&[0, 1]));
        let big = i64::MAX as u64;
        tracker.record_assignment(0, big).unwrap();
        tracker.record_assignment(0, big).unwrap();
        assert_eq!(tracker.record_assignment(0, big), Ok(u64::MAX));
        tracker.record_assignment(1, big).unwrap();

        assert_eq!(
            tracker.total_load(),
            u128::from(u64::MAX) + u128::from(big)
        );
    }

    #[test]
    fn loads_follow_pool_order() {
        let mut tracker = LoadTracker::initialize(&pool(&[3, 1, 2]));
        tracker.record_assignment(1, 8).unwrap();

        let loads = tracker.loads();
        assert_eq!(
            loads,
            vec![
                WorkerLoad { worker_id: 3, load: 0 },
                WorkerLoad { worker_id: 1, load: 8 },
                WorkerLoad { worker_id: 2, load: 0 },
            ]
        );
    }
}
