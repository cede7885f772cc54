use monitor_core::format::bytes_to_mb;
use monitor_core::state::ProcessReport;
use std::cmp::Ordering;
use sysinfo::System;

/// The `count` busiest processes, highest CPU usage first.
pub fn collect(sys: &System, count: usize) -> Vec<ProcessReport> {
    let processes = sys
        .processes()
        .values()
        .map(|p| ProcessReport {
            name:         p.name().to_string_lossy().to_string(),
            pid:          p.pid().as_u32(),
            cpu_usage:    f64::from(p.cpu_usage()),
            memory_usage: bytes_to_mb(p.memory()),
        })
        .collect();

    top_by_cpu(processes, count)
}

fn top_by_cpu(mut processes: Vec<ProcessReport>, count: usize) -> Vec<ProcessReport> {
    processes.sort_by(|a, b| {
        b.cpu_usage
            .partial_cmp(&a.cpu_usage)
            .unwrap_or(Ordering::Equal)
            .then(a.pid.cmp(&b.pid))
    });
    processes.truncate(count);
    processes
}
