//! cloudlb-sim — the simulated datacenter around the broker.
//!
//! Provides what the broker treats as external collaborators: hosts and VM
//! provisioning, a seeded workload generator, and an execution engine that
//! turns assignments into completion records.
//!
//! # Components
//!
//! - **`host`** / **`provisioning`** — hosts and VM placement
//! - **`workload`** — seeded task and host generation
//! - **`engine`** — time-shared / space-shared execution per worker
//! - **`simulation`** — per-batch orchestration

pub mod engine;
pub mod error;
pub mod host;
pub mod provisioning;
pub mod simulation;
pub mod workload;

pub use engine::ExecutionEngine;
pub use error::{EngineError, SimError, SimResult};
pub use host::Host;
pub use provisioning::{Datacenter, Provisioned};
pub use simulation::{BatchRun, Simulation};
pub use workload::WorkloadGenerator;
