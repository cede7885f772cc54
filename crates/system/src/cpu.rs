use monitor_core::state::CpuReport;
use sysinfo::System;

/// Read total and per-core usage from an already refreshed [`System`].
pub fn collect(sys: &System) -> CpuReport {
    let cpus = sys.cpus();
    let core_usage: Vec<f64> = cpus.iter().map(|c| f64::from(c.cpu_usage())).collect();

    CpuReport {
        usage:      f64::from(sys.global_cpu_usage()),
        cores:      u32::try_from(cpus.len()).unwrap_or(u32::MAX),
        frequency:  cpus.first().map(|c| c.frequency() as f64).unwrap_or(0.0),
        core_usage,
    }
}
