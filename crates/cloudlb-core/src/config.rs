//! cloudlb.toml configuration parser.
//!
//! Every section and field is optional; omitted values fall back to the
//! defaults of the reference scenario (4 hosts, 4 VMs, batches of 24 and 36).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown dispatch policy: {0}")]
    UnknownPolicy(String),

    #[error("unknown execution model: {0}")]
    UnknownModel(String),

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field}: min {min} exceeds max {max}")]
    EmptyRange {
        field: &'static str,
        min: u64,
        max: u64,
    },

    #[error("submission time must be a finite non-negative number, got {0}")]
    SubmissionTime(f64),
}

/// Which dispatch policy the broker uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    LeastLoaded,
    RoundRobin,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [PolicyKind::LeastLoaded, PolicyKind::RoundRobin];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::LeastLoaded => "least-loaded",
            PolicyKind::RoundRobin => "round-robin",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "least-loaded" => Ok(PolicyKind::LeastLoaded),
            "round-robin" => Ok(PolicyKind::RoundRobin),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// How a worker shares its PEs among the tasks assigned to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionModel {
    /// All tasks run concurrently and split the worker's capacity.
    #[default]
    TimeShared,
    /// Tasks run one after another, each holding its PEs exclusively.
    SpaceShared,
}

impl ExecutionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionModel::TimeShared => "time-shared",
            ExecutionModel::SpaceShared => "space-shared",
        }
    }
}

impl fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time-shared" => Ok(ExecutionModel::TimeShared),
            "space-shared" => Ok(ExecutionModel::SpaceShared),
            other => Err(ConfigError::UnknownModel(other.to_string())),
        }
    }
}

/// Inclusive uniform range used for randomized host specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: u64,
    pub max: u64,
}

impl UniformRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::EmptyRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
    pub policy: PolicyKind,
    pub workload: WorkloadConfig,
    pub datacenter: DatacenterConfig,
    pub hosts: HostsConfig,
    pub vms: VmsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Batch sizes, run one after another on fresh datacenters.
    pub batches: Vec<usize>,
    /// Task lengths are drawn from `1..=length_ceiling`.
    pub length_ceiling: u32,
    /// File and output sizes are drawn from `1..=file_size_ceiling`.
    pub file_size_ceiling: u32,
    pub pes_per_task: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacenterConfig {
    pub id: u32,
    pub name: String,
    pub model: ExecutionModel,
    /// Simulated time at which dispatched tasks reach their workers.
    pub submission_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    pub count: u32,
    pub pes: u32,
    pub mips: UniformRange,
    pub ram_mb: UniformRange,
    pub storage_mb: UniformRange,
    pub bw: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmsConfig {
    pub count: u32,
    pub mips: u32,
    pub pes: u32,
    pub ram_mb: u32,
    pub bw: u64,
    pub size_mb: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            policy: PolicyKind::default(),
            workload: WorkloadConfig::default(),
            datacenter: DatacenterConfig::default(),
            hosts: HostsConfig::default(),
            vms: VmsConfig::default(),
        }
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            batches: vec![24, 36],
            length_ceiling: 1000,
            file_size_ceiling: 500,
            pes_per_task: 1,
        }
    }
}

impl Default for DatacenterConfig {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Datacenter".to_string(),
            model: ExecutionModel::default(),
            submission_time: 0.1,
        }
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            count: 4,
            pes: 1,
            mips: UniformRange::new(1000, 2000),
            ram_mb: UniformRange::new(2048, 4096),
            storage_mb: UniformRange::new(1_000_000, 2_000_000),
            bw: 10_000,
        }
    }
}

impl Default for VmsConfig {
    fn default() -> Self {
        Self {
            count: 4,
            mips: 250,
            pes: 1,
            ram_mb: 512,
            bw: 1000,
            size_mb: 10_000,
        }
    }
}

fn positive(value: u64, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NotPositive { field });
    }
    Ok(())
}

impl SimConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value constraints that serde cannot express.
    ///
    /// A VM count of zero is accepted: the resulting empty pool is reported
    /// by the broker when the batch is dispatched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workload.batches.is_empty() {
            return Err(ConfigError::NotPositive {
                field: "workload.batches",
            });
        }
        for &size in &self.workload.batches {
            positive(size as u64, "workload.batches[]")?;
        }
        positive(self.workload.length_ceiling.into(), "workload.length_ceiling")?;
        positive(
            self.workload.file_size_ceiling.into(),
            "workload.file_size_ceiling",
        )?;
        positive(self.workload.pes_per_task.into(), "workload.pes_per_task")?;

        let submission = self.datacenter.submission_time;
        if !submission.is_finite() || submission < 0.0 {
            return Err(ConfigError::SubmissionTime(submission));
        }

        positive(self.hosts.count.into(), "hosts.count")?;
        positive(self.hosts.pes.into(), "hosts.pes")?;
        positive(self.hosts.mips.min, "hosts.mips.min")?;
        self.hosts.mips.check("hosts.mips")?;
        self.hosts.ram_mb.check("hosts.ram_mb")?;
        self.hosts.storage_mb.check("hosts.storage_mb")?;

        positive(self.vms.mips.into(), "vms.mips")?;
        positive(self.vms.pes.into(), "vms.pes")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scenario() {
        let config = SimConfig::default();
        assert_eq!(config.workload.batches, vec![24, 36]);
        assert_eq!(config.workload.length_ceiling, 1000);
        assert_eq!(config.hosts.count, 4);
        assert_eq!(config.vms.count, 4);
        assert_eq!(config.vms.mips, 250);
        assert_eq!(config.policy, PolicyKind::LeastLoaded);
        assert_eq!(config.datacenter.model, ExecutionModel::TimeShared);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_empty_file_uses_defaults() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn parse_partial_sections() {
        let toml_str = r#"
seed = 42
policy = "round-robin"

[workload]
batches = [10]

[datacenter]
model = "space-shared"

[vms]
count = 2
mips = 500
"#;
        let config = SimConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.policy, PolicyKind::RoundRobin);
        assert_eq!(config.workload.batches, vec![10]);
        assert_eq!(config.workload.length_ceiling, 1000);
        assert_eq!(config.datacenter.model, ExecutionModel::SpaceShared);
        assert_eq!(config.datacenter.submission_time, 0.1);
        assert_eq!(config.vms.count, 2);
        assert_eq!(config.vms.mips, 500);
        assert_eq!(config.vms.ram_mb, 512);
    }

    #[test]
    fn scaffold_round_trips_through_toml() {
        let mut config = SimConfig::default();
        config.seed = Some(7);
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("least-loaded"));
        let parsed = SimConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_inverted_range() {
        let mut config = SimConfig::default();
        config.hosts.mips = UniformRange::new(2000, 1000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyRange {
                field: "hosts.mips",
                min: 2000,
                max: 1000
            })
        );
    }

    #[test]
    fn rejects_zero_batch_size() {
        let mut config = SimConfig::default();
        config.workload.batches = vec![24, 0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn rejects_negative_submission_time() {
        let mut config = SimConfig::default();
        config.datacenter.submission_time = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::SubmissionTime(-1.0)));
    }

    #[test]
    fn zero_vms_is_left_to_dispatch() {
        let mut config = SimConfig::default();
        config.vms.count = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn policy_parses_from_cli_form() {
        assert_eq!(
            "round-robin".parse::<PolicyKind>(),
            Ok(PolicyKind::RoundRobin)
        );
        assert_eq!(
            "fastest".parse::<PolicyKind>(),
            Err(ConfigError::UnknownPolicy("fastest".to_string()))
        );
        assert_eq!(PolicyKind::LeastLoaded.to_string(), "least-loaded");
        assert_eq!(
            "space-shared".parse::<ExecutionModel>(),
            Ok(ExecutionModel::SpaceShared)
        );
    }
}
