//! cloudlb-broker — dispatches a batch of tasks onto a fixed worker pool.
//!
//! The broker decides, for each task in arrival order, which worker receives
//! it, using only its own running estimate of per-worker load. It never sees
//! execution progress while dispatching. After execution the
//! [`ResultCollector`] turns completion records into an ordered [`Report`].
//!
//! # Architecture
//!
//! ```text
//! Dispatcher<P: DispatchPolicy>
//!   ├── WorkerPool   (ordered workers, read-only)
//!   ├── LoadTracker  (accumulated length per worker)
//!   └── policy       LeastLoadedScheduler | RoundRobinBalancer
//!
//! ResultCollector → Report → report::format_report
//! ```

pub mod collector;
pub mod error;
pub mod least_loaded;
pub mod load_balancer;
pub mod policy;
pub mod pool;
pub mod report;
pub mod tracker;

pub use collector::{Report, ResultCollector, WorkerSummary};
pub use error::{DispatchError, DispatchResult};
pub use least_loaded::LeastLoadedScheduler;
pub use load_balancer::RoundRobinBalancer;
pub use policy::{DispatchOutcome, DispatchPolicy, Dispatcher, SkippedTask, policy_for};
pub use pool::WorkerPool;
pub use tracker::{LoadRecord, LoadTracker, WorkerLoad};
