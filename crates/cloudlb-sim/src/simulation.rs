//! Batch runner tying provisioning, dispatch and execution together.
//!
//! Each batch gets a freshly provisioned datacenter. The only state carried
//! across batches is the random stream, so a whole run is reproducible from
//! its seed regardless of the dispatch policy.

use cloudlb_broker::{DispatchOutcome, Dispatcher, Report, ResultCollector, WorkerPool, policy_for};
use cloudlb_core::SimConfig;
use serde::Serialize;
use tracing::info;

use crate::engine::ExecutionEngine;
use crate::error::SimResult;
use crate::provisioning::{Datacenter, Provisioned};
use crate::workload::{self, WorkloadGenerator};

/// Everything produced by one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRun {
    /// Position of the batch in the run, from 0.
    pub index: usize,
    pub size: usize,
    pub provisioned: Provisioned,
    pub outcome: DispatchOutcome,
    pub report: Report,
}

pub struct Simulation {
    config: SimConfig,
    generator: WorkloadGenerator,
}

impl Simulation {
    /// Validate `config` and seed the generator, drawing a seed if none is set.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, policy = %config.policy, model = %config.datacenter.model, "simulation initialised");
        Ok(Self {
            config,
            generator: WorkloadGenerator::new(seed),
        })
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Provision, dispatch and execute one batch of `size` tasks.
    pub fn run_batch(&mut self, index: usize, size: usize) -> SimResult<BatchRun> {
        let config = &self.config;

        let hosts = self.generator.hosts(&config.hosts);
        let mut datacenter = Datacenter::new(config.datacenter.id, config.datacenter.name.clone(), hosts);
        let provisioned = datacenter.create_vms(workload::vms(&config.vms));
        let pool = WorkerPool::new(provisioned.created.clone())?;

        let tasks = self.generator.tasks(size, &config.workload);
        let outcome = Dispatcher::new(policy_for(config.policy)).dispatch(&pool, &tasks)?;

        let mut engine = ExecutionEngine::new(
            datacenter.id,
            config.datacenter.model,
            config.datacenter.submission_time,
            pool.list_workers(),
        )?;
        engine.submit_all(&outcome.assignments, &tasks)?;
        let report = engine.run().into_iter().collect::<ResultCollector>().report();

        info!(
            batch = index,
            tasks = size,
            completed = report.success_count(),
            makespan = report.makespan(),
            "batch finished"
        );

        Ok(BatchRun {
            index,
            size,
            provisioned,
            outcome,
            report,
        })
    }

    /// Run every configured batch in order, stopping at the first failure.
    pub fn run_all(&mut self) -> SimResult<Vec<BatchRun>> {
        let sizes = self.config.workload.batches.clone();
        sizes
            .into_iter()
            .enumerate()
            .map(|(index, size)| self.run_batch(index, size))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use cloudlb_broker::DispatchError;

    fn seeded(seed: u64) -> SimConfig {
        SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        }
    }

    #[test]
    fn runs_default_batches() {
        let mut sim = Simulation::new(seeded(1)).unwrap();
        let runs = sim.run_all().unwrap();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].size, 24);
        assert_eq!(runs[1].size, 36);
        assert_eq!(runs[0].report.rows.len(), 24);
        assert_eq!(runs[1].report.rows.len(), 36);
        assert_eq!(runs[0].provisioned.created.len(), 4);
        assert!(runs.iter().all(|r| r.report.success_count() == r.size));
    }

    #[test]
    fn explicit_seed_is_kept() {
        let sim = Simulation::new(seeded(1234)).unwrap();
        assert_eq!(sim.seed(), 1234);
    }

    #[test]
    fn zero_vms_fails_with_no_workers() {
        let mut config = seeded(1);
        config.vms.count = 0;
        let mut sim = Simulation::new(config).unwrap();

        let err = sim.run_all().unwrap_err();
        assert!(matches!(err, SimError::Dispatch(DispatchError::NoWorkersAvailable)));
    }

    #[test]
    fn vms_too_large_for_hosts_leave_pool_empty() {
        let mut config = seeded(1);
        config.vms.mips = 5000;
        let mut sim = Simulation::new(config).unwrap();

        let err = sim.run_batch(0, 5).unwrap_err();
        assert!(matches!(err, SimError::Dispatch(DispatchError::NoWorkersAvailable)));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = seeded(1);
        config.workload.batches.clear();
        assert!(matches!(Simulation::new(config), Err(SimError::Config(_))));
    }
}
