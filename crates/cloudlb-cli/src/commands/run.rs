use cloudlb_broker::report::format_report;
use cloudlb_core::{ExecutionModel, PolicyKind};
use cloudlb_sim::{BatchRun, Simulation};
use serde::Serialize;

use super::{Overrides, load_config};

/// How `run` prints its batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    seed: u64,
    policy: PolicyKind,
    model: ExecutionModel,
    batches: &'a [BatchRun],
}

pub fn run(config: Option<&str>, overrides: &Overrides, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config, overrides)?;
    let mut sim = Simulation::new(config)?;
    let batches = sim.run_all()?;

    match format {
        OutputFormat::Json => {
            let output = RunOutput {
                seed: sim.seed(),
                policy: sim.config().policy,
                model: sim.config().datacenter.model,
                batches: &batches,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!(
                "Seed {}  policy {}  model {}",
                sim.seed(),
                sim.config().policy,
                sim.config().datacenter.model
            );
            for batch in &batches {
                print!("{}", format_batch(batch));
            }
        }
    }

    Ok(())
}

fn format_batch(batch: &BatchRun) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\nBatch {} — {} cloudlets on {} VMs\n",
        batch.index + 1,
        batch.size,
        batch.provisioned.created.len()
    ));
    if !batch.provisioned.failed.is_empty() {
        out.push_str(&format!("  VMs not created: {:?}\n", batch.provisioned.failed));
    }
    if batch.outcome.skipped_count() > 0 {
        out.push_str(&format!("  Skipped cloudlets: {}\n", batch.outcome.skipped_count()));
        for skipped in &batch.outcome.skipped {
            out.push_str(&format!("    {}\n", skipped.error()));
        }
    }
    out.push_str(&format_report(&batch.report));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudlb_core::SimConfig;

    #[test]
    fn batch_text_contains_report() {
        let config = SimConfig {
            seed: Some(4),
            ..SimConfig::default()
        };
        let batches = Simulation::new(config).unwrap().run_all().unwrap();
        let text = format_batch(&batches[0]);

        assert!(text.contains("Batch 1 — 24 cloudlets on 4 VMs"));
        assert!(text.contains("========== OUTPUT =========="));
        assert!(text.contains("Completed: 24/24"));
        assert!(!text.contains("Skipped"));
    }
}
