use cloudlb_broker::report::format_time;
use cloudlb_core::PolicyKind;
use cloudlb_sim::{BatchRun, Simulation};

use super::{Overrides, load_config};

/// Run the configured batches once per policy with a shared seed.
pub fn compare(config: Option<&str>, overrides: &Overrides) -> anyhow::Result<()> {
    let mut base = load_config(config, overrides)?;
    // Pin the seed so every policy sees the same hosts and tasks.
    let seed = Simulation::new(base.clone())?.seed();
    base.seed = Some(seed);

    let mut results = Vec::new();
    for policy in PolicyKind::ALL {
        let mut config = base.clone();
        config.policy = policy;
        let batches = Simulation::new(config)?.run_all()?;
        results.push((policy, batches));
    }

    println!("Seed {seed}");
    print!("{}", format_comparison(&results));
    Ok(())
}

fn format_comparison(results: &[(PolicyKind, Vec<BatchRun>)]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8}{:<14}{:>10}{:>10}{:>10}{:>9}\n",
        "Batch", "Policy", "Makespan", "Max load", "Min load", "Skipped"
    ));

    let batch_count = results.first().map_or(0, |(_, b)| b.len());
    for i in 0..batch_count {
        for (policy, batches) in results {
            let batch = &batches[i];
            out.push_str(&format!(
                "{:<8}{:<14}{:>10}{:>10}{:>10}{:>9}\n",
                i + 1,
                policy.as_str(),
                format_time(batch.report.makespan()),
                batch.outcome.max_load(),
                batch.outcome.min_load(),
                batch.outcome.skipped_count(),
            ));
        }
    }
    out
}
