pub mod config;
pub mod types;

pub use config::{ConfigError, ExecutionModel, PolicyKind, SimConfig};
pub use types::*;
