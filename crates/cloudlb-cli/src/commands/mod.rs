pub mod compare;
pub mod init;
pub mod run;

use std::path::Path;

use cloudlb_core::{ExecutionModel, PolicyKind, SimConfig};
use tracing::debug;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub policy: Option<PolicyKind>,
    pub model: Option<ExecutionModel>,
}

/// Load `path` (or the built-in defaults) and apply `overrides`.
pub fn load_config(path: Option<&str>, overrides: &Overrides) -> anyhow::Result<SimConfig> {
    let mut config = match path {
        Some(path) => {
            debug!(path, "loading configuration");
            SimConfig::from_file(Path::new(path))?
        }
        None => SimConfig::default(),
    };

    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(policy) = overrides.policy {
        config.policy = policy;
    }
    if let Some(model) = overrides.model {
        config.datacenter.model = model;
    }
    Ok(config)
}
