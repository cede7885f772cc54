use monitor_core::state::{GpuReport, UNKNOWN_NAME};
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::{debug, info};

const QUERY: &str = "--query-gpu=name,utilization.gpu,memory.used,memory.total,temperature.gpu";

/// Queries `nvidia-smi` for the first GPU.
///
/// Once the tool is found to be missing the probe stops spawning it, so hosts
/// without an NVIDIA driver pay the lookup cost only once.
#[derive(Debug)]
pub struct GpuProbe {
    enabled: bool,
}

impl GpuProbe {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub async fn collect(&mut self) -> Option<GpuReport> {
        if !self.enabled {
            return None;
        }

        let output = match Command::new("nvidia-smi")
            .args([QUERY, "--format=csv,noheader,nounits"])
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("nvidia-smi not found; GPU metrics disabled");
                self.enabled = false;
                return None;
            }
            Err(e) => {
                debug!("nvidia-smi failed: {e}");
                return None;
            }
        };

        if !output.status.success() {
            debug!("nvidia-smi exited with {}", output.status);
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_csv_line(stdout.lines().next()?)
    }
}

impl Default for GpuProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one `name, util, mem.used, mem.total, temp` line.  Fields that are
/// not numbers (e.g. `[N/A]`) read as 0.
fn parse_csv_line(line: &str) -> Option<GpuReport> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 5 {
        return None;
    }

    let number = |s: &str| s.parse::<f64>().unwrap_or(0.0);
    let name = if parts[0].is_empty() { UNKNOWN_NAME } else { parts[0] };

    Some(GpuReport {
        name:         name.to_string(),
        usage:        number(parts[1]),
        memory_used:  number(parts[2]),
        memory_total: number(parts[3]),
        temperature:  number(parts[4]),
    })
}
