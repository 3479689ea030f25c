//! Human-readable report formatting.

use crate::collector::Report;

const INDENT: &str = "    ";

/// Format a time value with at most two decimals, without trailing zeros.
pub fn format_time(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn format_report(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("\n========== OUTPUT ==========\n");
    out.push_str(&format!(
        "Cloudlet ID{INDENT}Data center ID{INDENT}VM ID{INDENT}Time{INDENT}Start Time{INDENT}Finish Time{INDENT}STATUS\n"
    ));
    out.push_str(&format!(
        "{:<13}{:<16}{:<10}{:<7}{:<12}{:<13}{:<11}\n",
        "----------", "----------------  ", "-------", "------", "------------  ", "-------------  ", "---------"
    ));

    for row in &report.rows {
        out.push_str(&format!(
            "{:<20}{:<14}{:<8}{:<11}{:<14}{:<11}",
            row.task_id,
            row.resource_id,
            row.worker_id,
            format_time(row.cpu_time),
            format_time(row.start_time),
            format_time(row.finish_time),
        ));
        if row.status.is_success() {
            out.push_str(&format!("{:<11}", row.status.label()));
        }
        out.push('\n');
    }

    let summaries = report.worker_summaries();
    if !summaries.is_empty() {
        out.push_str("\nPer VM:\n");
        for s in &summaries {
            out.push_str(&format!(
                "  VM {:<4} {:>3} cloudlets, cpu time {:<10} last finish {}\n",
                s.worker_id,
                s.tasks,
                format_time(s.cpu_time),
                format_time(s.last_finish),
            ));
        }
    }

    out.push_str(&format!(
        "\nCompleted: {}/{}  Makespan: {}\n",
        report.success_count(),
        report.rows.len(),
        format_time(report.makespan())
    ));

    out
}
