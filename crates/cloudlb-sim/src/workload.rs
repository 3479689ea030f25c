//! Seeded generation of tasks, hosts and VMs.
//!
//! All randomness in a run flows through one [`WorkloadGenerator`], so a run
//! is reproduced by reusing its seed. The broker itself never draws numbers.

use cloudlb_core::config::{HostsConfig, UniformRange, VmsConfig, WorkloadConfig};
use cloudlb_core::{Task, TaskId, Worker, WorkerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::host::Host;

pub struct WorkloadGenerator {
    seed: u64,
    rng: StdRng,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn draw(&mut self, range: UniformRange) -> u64 {
        self.rng.gen_range(range.min..=range.max)
    }

    /// `count` tasks with ids `0..count` and lengths in `1..=length_ceiling`.
    pub fn tasks(&mut self, count: usize, config: &WorkloadConfig) -> Vec<Task> {
        (0..count)
            .map(|i| {
                let length = self.rng.gen_range(1..=i64::from(config.length_ceiling));
                let file_size = self.rng.gen_range(1..=u64::from(config.file_size_ceiling));
                Task::new(i as TaskId, length)
                    .with_sizes(file_size, file_size)
                    .with_pes(config.pes_per_task)
            })
            .collect()
    }

    /// Hosts with per-host MIPS, RAM and storage drawn from the configured ranges.
    pub fn hosts(&mut self, config: &HostsConfig) -> Vec<Host> {
        (0..config.count)
            .map(|id| {
                let mips = self.draw(config.mips);
                let ram_mb = self.draw(config.ram_mb);
                let storage_mb = self.draw(config.storage_mb);
                Host::new(
                    id,
                    config.pes,
                    u32::try_from(mips).unwrap_or(u32::MAX),
                    ram_mb,
                    config.bw,
                    storage_mb,
                )
            })
            .collect()
    }
}

/// Identical VMs with ids `0..count`.
pub fn vms(config: &VmsConfig) -> Vec<Worker> {
    (0..config.count)
        .map(|id: WorkerId| Worker {
            id,
            mips: config.mips,
            pes: config.pes,
            ram_mb: config.ram_mb,
            bw: config.bw,
            size_mb: config.size_mb,
        })
        .collect()
}
