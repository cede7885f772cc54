use monitor_core::format::bytes_to_mb;
use monitor_core::state::MemoryReport;
use sysinfo::System;

pub fn collect(sys: &System) -> MemoryReport {
    let total = sys.total_memory();
    let used = sys.used_memory();
    report(total, used)
}

fn report(total: u64, used: u64) -> MemoryReport {
    let usage_percent = if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    };

    MemoryReport {
        total: bytes_to_mb(total),
        used: bytes_to_mb(used),
        free: bytes_to_mb(total.saturating_sub(used)),
        usage_percent,
    }
}
