use crate::disk::per_second;
use monitor_core::format::bytes_to_mb;
use monitor_core::state::NetworkReport;
use sysinfo::Networks;

/// Sum the per-refresh byte deltas of every non-loopback interface.
pub fn collect(networks: &Networks, elapsed_secs: f64) -> NetworkReport {
    // `received()` / `transmitted()` are deltas since the last refresh.
    let (rx, tx) = networks
        .iter()
        .filter(|(name, _)| !is_loopback(name))
        .fold((0u64, 0u64), |(rx, tx), (_, data)| {
            (rx + data.received(), tx + data.transmitted())
        });

    NetworkReport {
        download_speed:     per_second(bytes_to_mb(rx), elapsed_secs),
        upload_speed:       per_second(bytes_to_mb(tx), elapsed_secs),
        active_connections: active_connections(),
    }
}

fn is_loopback(name: &str) -> bool {
    name == "lo" || name.starts_with("lo0") || name.starts_with("Loopback")
}

/// Established TCP sockets (IPv4 + IPv6).
#[cfg(target_os = "linux")]
fn active_connections() -> u32 {
    ["/proc/net/tcp", "/proc/net/tcp6"]
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .map(|table| count_established(&table))
        .sum()
}

#[cfg(not(target_os = "linux"))]
fn active_connections() -> u32 {
    0
}

/// Count rows in a `/proc/net/tcp` table whose state column is `01`
/// (ESTABLISHED).  The first line is a header.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn count_established(table: &str) -> u32 {
    let count = table
        .lines()
        .skip(1)
        .filter(|line| line.split_whitespace().nth(3) == Some("01"))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
