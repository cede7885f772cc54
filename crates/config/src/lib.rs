pub mod schema;

pub use schema::{CollectorConfig, DashboardConfig, MonitorConfig, ServerConfig};

use monitor_core::{McError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()` if
/// the file doesn't exist so both binaries always have sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| McError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<MonitorConfig> {
    let config: MonitorConfig =
        toml::from_str(raw).map_err(|e| McError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject settings that would stall the collector or degenerate the charts.
pub fn validate(config: &MonitorConfig) -> Result<()> {
    if config.collector.interval_ms == 0 {
        return Err(McError::Config("collector.interval_ms must be positive".into()));
    }
    if config.dashboard.history_capacity == 0 {
        return Err(McError::Config("dashboard.history_capacity must be positive".into()));
    }
    if config.dashboard.reconnect_secs == 0 {
        return Err(McError::Config("dashboard.reconnect_secs must be positive".into()));
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("monitorcore").join("monitorcore.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.collector.interval_ms, 1_000);
        assert_eq!(config.dashboard.history_capacity, 30);
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            [server]
            bind = "0.0.0.0:5000"

            [dashboard]
            history_capacity = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:5000");
        assert_eq!(config.dashboard.history_capacity, 60);
        assert_eq!(config.dashboard.reconnect_secs, 2);
        assert_eq!(config.collector.top_processes, 10);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = parse("[collector]\ninterval_ms = 0\n").unwrap_err();
        assert!(matches!(err, McError::Config(_)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(parse("[dashboard]\nhistory_capacity = 0\n").is_err());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = parse("[server\nbind = 1").unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("monitorcore-does-not-exist.toml");
        assert_eq!(load(path).unwrap(), MonitorConfig::default());
    }

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(default_path().ends_with("monitorcore/monitorcore.toml"));
    }
}
