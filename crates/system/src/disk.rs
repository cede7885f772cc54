use monitor_core::format::{bytes_to_gb, bytes_to_mb};
use monitor_core::state::DiskReport;
use sysinfo::Disks;

/// One report per mounted disk.  `elapsed_secs` converts the per-refresh I/O
/// deltas into MB/s.
pub fn collect(disks: &Disks, elapsed_secs: f64) -> Vec<DiskReport> {
    disks
        .iter()
        .map(|d| {
            let total = d.total_space();
            let free = d.available_space();
            let io = d.usage();

            DiskReport {
                name:        d.name().to_string_lossy().to_string(),
                mount_point: d.mount_point().to_string_lossy().to_string(),
                total:       bytes_to_gb(total),
                used:        bytes_to_gb(total.saturating_sub(free)),
                free:        bytes_to_gb(free),
                read_speed:  per_second(bytes_to_mb(io.read_bytes), elapsed_secs),
                write_speed: per_second(bytes_to_mb(io.written_bytes), elapsed_secs),
            }
        })
        .collect()
}

/// `amount / elapsed`, or 0 before a full interval has passed.
pub(crate) fn per_second(amount: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        amount / elapsed_secs
    } else {
        0.0
    }
}
