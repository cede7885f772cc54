use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `monitorcore.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Push server settings (collector side).
    pub server: ServerConfig,
    /// Sampling settings (collector side).
    pub collector: CollectorConfig,
    /// Dashboard client settings.
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the push server listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Milliseconds between snapshots.
    pub interval_ms: u64,
    /// How many processes (by CPU usage) each snapshot carries.
    pub top_processes: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            interval_ms:   1_000,
            top_processes: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address of the push server to connect to.
    pub server: String,
    /// Samples kept per chart.
    pub history_capacity: usize,
    /// Seconds to wait before reconnecting after the connection drops.
    pub reconnect_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server:           "127.0.0.1:5000".to_string(),
            history_capacity: monitor_core::series::DEFAULT_CAPACITY,
            reconnect_secs:   2,
        }
    }
}
