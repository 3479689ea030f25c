//! Full batches: provisioning → dispatch → execution → report.

use cloudlb_core::{ExecutionModel, PolicyKind, SimConfig, TaskStatus};
use cloudlb_sim::{BatchRun, Simulation};

fn config(seed: u64, policy: PolicyKind, model: ExecutionModel) -> SimConfig {
    let mut config = SimConfig::default();
    config.seed = Some(seed);
    config.policy = policy;
    config.datacenter.model = model;
    config
}

fn run(config: SimConfig) -> Vec<BatchRun> {
    Simulation::new(config).unwrap().run_all().unwrap()
}

#[test]
fn same_seed_reproduces_the_run() {
    let a = run(config(7, PolicyKind::LeastLoaded, ExecutionModel::TimeShared));
    let b = run(config(7, PolicyKind::LeastLoaded, ExecutionModel::TimeShared));

    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.outcome, y.outcome);
        assert_eq!(x.report, y.report);
    }
}

#[test]
fn report_rows_sorted_and_complete() {
    for batch in run(config(3, PolicyKind::LeastLoaded, ExecutionModel::TimeShared)) {
        let ids: Vec<u64> = batch.report.rows.iter().map(|r| r.task_id).collect();
        let expected: Vec<u64> = (0..batch.size as u64).collect();
        assert_eq!(ids, expected);

        for row in &batch.report.rows {
            assert_eq!(row.status, TaskStatus::Success);
            assert_eq!(row.resource_id, 0);
            assert!((row.start_time - 0.1).abs() < 1e-9);
            assert!((row.cpu_time - (row.finish_time - row.start_time)).abs() < 1e-9);
        }
    }
}

#[test]
fn rows_land_on_assigned_workers() {
    for batch in run(config(21, PolicyKind::LeastLoaded, ExecutionModel::SpaceShared)) {
        for assignment in &batch.outcome.assignments {
            let row = &batch.report.rows[assignment.task_id as usize];
            assert_eq!(row.worker_id, assignment.worker_id);
        }
    }
}

#[test]
fn worker_drains_its_dispatched_load() {
    // All tasks reach a worker together, so under either model it is busy
    // until submission + load / mips.
    for model in [ExecutionModel::TimeShared, ExecutionModel::SpaceShared] {
        for batch in run(config(11, PolicyKind::LeastLoaded, model)) {
            for summary in batch.report.worker_summaries() {
                let load = batch.outcome.load_of(summary.worker_id).unwrap() as f64;
                let expected = 0.1 + load / 250.0;
                assert!(
                    (summary.last_finish - expected).abs() < 1e-6,
                    "worker {} finished at {} expected {}",
                    summary.worker_id,
                    summary.last_finish,
                    expected
                );
            }
        }
    }
}

#[test]
fn policies_see_identical_workloads() {
    let greedy = run(config(5, PolicyKind::LeastLoaded, ExecutionModel::TimeShared));
    let rotation = run(config(5, PolicyKind::RoundRobin, ExecutionModel::TimeShared));

    for (g, r) in greedy.iter().zip(&rotation) {
        assert_eq!(g.outcome.total_assigned_length(), r.outcome.total_assigned_length());
        assert_eq!(g.outcome.policy, "least-loaded");
        assert_eq!(r.outcome.policy, "round-robin");
        // Identical VMs: makespan follows the heaviest load.
        assert!(g.outcome.max_load() <= r.outcome.max_load() + 1000);
    }
}

#[test]
fn batch_run_serializes_to_json() {
    let runs = run(config(2, PolicyKind::LeastLoaded, ExecutionModel::TimeShared));
    let json = serde_json::to_value(&runs[0]).unwrap();
    assert_eq!(json["size"], 24);
    assert_eq!(json["report"]["rows"][0]["status"], "SUCCESS");
}
