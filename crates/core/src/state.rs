use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Placeholder shown when a record arrives without a name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// One metrics snapshot as pushed by the server.
///
/// Every record is optional: an absent record means "no data this tick" and
/// leaves the matching part of the dashboard untouched.  A record that cannot
/// be decoded is dropped on its own; the rest of the snapshot survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSnapshot {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::record")]
    pub cpu: Option<CpuReport>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::record")]
    pub gpu: Option<GpuReport>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::record")]
    pub memory: Option<MemoryReport>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::record")]
    pub network: Option<NetworkReport>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::list")]
    pub disks: Option<Vec<DiskReport>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::list")]
    pub processes: Option<Vec<ProcessReport>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CpuReport {
    /// Total usage (0.0 – 100.0).
    #[serde(deserialize_with = "lenient::number")]
    pub usage: f64,
    /// Logical core count.
    #[serde(deserialize_with = "lenient::count")]
    pub cores: u32,
    /// Current frequency in MHz.
    #[serde(deserialize_with = "lenient::number")]
    pub frequency: f64,
    /// Per-core usage (0.0 – 100.0).
    #[serde(deserialize_with = "lenient::numbers")]
    pub core_usage: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GpuReport {
    #[serde(deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub usage: f64,
    /// Used video memory in MB.
    #[serde(deserialize_with = "lenient::number")]
    pub memory_used: f64,
    /// Total video memory in MB.
    #[serde(deserialize_with = "lenient::number")]
    pub memory_total: f64,
    /// Degrees Celsius; 0 when the sensor is unavailable.
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: f64,
}

impl Default for GpuReport {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            usage: 0.0,
            memory_used: 0.0,
            memory_total: 0.0,
            temperature: 0.0,
        }
    }
}

/// Memory figures, all in MB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryReport {
    #[serde(deserialize_with = "lenient::number")]
    pub total: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub used: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub free: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkReport {
    /// MB/s received across all interfaces.
    #[serde(deserialize_with = "lenient::number")]
    pub download_speed: f64,
    /// MB/s transmitted across all interfaces.
    #[serde(deserialize_with = "lenient::number")]
    pub upload_speed: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub active_connections: u32,
}

/// One mounted filesystem. Sizes are GB, speeds MB/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiskReport {
    #[serde(deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(deserialize_with = "lenient::name")]
    pub mount_point: String,
    #[serde(deserialize_with = "lenient::number")]
    pub total: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub used: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub free: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub read_speed: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub write_speed: f64,
}

impl Default for DiskReport {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            mount_point: UNKNOWN_NAME.to_string(),
            total: 0.0,
            used: 0.0,
            free: 0.0,
            read_speed: 0.0,
            write_speed: 0.0,
        }
    }
}

impl DiskReport {
    /// Used space as a percentage; 0 for a zero-sized disk.
    #[must_use]
    pub fn usage_percent(&self) -> f64 {
        if self.total > 0.0 {
            self.used / self.total * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessReport {
    #[serde(deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(deserialize_with = "lenient::count")]
    pub pid: u32,
    #[serde(deserialize_with = "lenient::number")]
    pub cpu_usage: f64,
    /// Resident memory in MB.
    #[serde(deserialize_with = "lenient::number")]
    pub memory_usage: f64,
}

impl Default for ProcessReport {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            pid: 0,
            cpu_usage: 0.0,
            memory_usage: 0.0,
        }
    }
}

/// Field decoders that map `null` to the same value a missing field gets.
mod lenient {
    use super::*;
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
    }

    pub fn numbers<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let values = Option::<Vec<Option<f64>>>::deserialize(d)?.unwrap_or_default();
        Ok(values.into_iter().map(|v| v.unwrap_or(0.0)).collect())
    }

    /// Any JSON number.  Fractions truncate, negatives and NaN read as 0 and
    /// anything past `u32::MAX` saturates.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = Option::<f64>::deserialize(d)?.unwrap_or(0.0);
        Ok(if value > 0.0 { value as u32 } else { 0 })
    }

    pub fn record<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Value>::deserialize(d)?.and_then(decode))
    }

    /// Entries that fail to decode are skipped; the others are kept.
    pub fn list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Some(value) = Option::<Value>::deserialize(d)? else {
            return Ok(None);
        };
        match value {
            Value::Array(items) => Ok(Some(items.into_iter().filter_map(decode).collect())),
            other => {
                warn!("Dropping {} list: expected an array, got {other}", short_name::<T>());
                Ok(None)
            }
        }
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value)
            .map_err(|e| warn!("Dropping malformed {} record: {e}", short_name::<T>()))
            .ok()
    }

    fn short_name<T>() -> &'static str {
        let full = std::any::type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }

    pub fn name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_else(|| UNKNOWN_NAME.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_records_decode_as_none() {
        let snap: SystemSnapshot = serde_json::from_str(r#"{"cpu": {"usage": 12.5}}"#).unwrap();
        assert!(snap.cpu.is_some());
        assert!(snap.gpu.is_none());
        assert!(snap.disks.is_none());
    }

    #[test]
    fn missing_numeric_field_defaults_to_zero() {
        let snap: SystemSnapshot =
            serde_json::from_str(r#"{"cpu": {"cores": 8}, "memory": {"usagePercent": null}}"#)
                .unwrap();
        let cpu = snap.cpu.unwrap();
        assert_eq!(cpu.usage, 0.0);
        assert_eq!(cpu.cores, 8);
        assert_eq!(snap.memory.unwrap().usage_percent, 0.0);
    }

    #[test]
    fn missing_name_gets_placeholder() {
        let snap: SystemSnapshot =
            serde_json::from_str(r#"{"gpu": {"usage": 3}, "processes": [{"pid": 7, "name": null}]}"#)
                .unwrap();
        assert_eq!(snap.gpu.unwrap().name, UNKNOWN_NAME);
        let procs = snap.processes.unwrap();
        assert_eq!(procs[0].name, UNKNOWN_NAME);
        assert_eq!(procs[0].pid, 7);
    }

    #[test]
    fn camel_case_fields_are_read() {
        let raw = r#"{"network": {"downloadSpeed": 1.5, "uploadSpeed": 0.25, "activeConnections": 4},
                      "disks": [{"name": "sda1", "mountPoint": "/", "total": 100, "used": 25, "free": 75}]}"#;
        let snap: SystemSnapshot = serde_json::from_str(raw).unwrap();
        let net = snap.network.unwrap();
        assert_eq!(net.download_speed, 1.5);
        assert_eq!(net.active_connections, 4);
        let disk = &snap.disks.unwrap()[0];
        assert_eq!(disk.mount_point, "/");
        assert_eq!(disk.usage_percent(), 25.0);
    }

    #[test]
    fn zero_sized_disk_has_zero_usage() {
        assert_eq!(DiskReport::default().usage_percent(), 0.0);
    }

    #[test]
    fn fractional_and_negative_counts_are_tolerated() {
        let snap: SystemSnapshot = serde_json::from_str(
            r#"{"cpu": {"usage": 10, "cores": 8.0},
                "network": {"activeConnections": 3.7},
                "processes": [{"name": "init", "pid": -1}],
                "memory": {"usagePercent": 50}}"#,
        )
        .unwrap();
        assert_eq!(snap.cpu.unwrap().cores, 8);
        assert_eq!(snap.network.unwrap().active_connections, 3);
        assert_eq!(snap.processes.unwrap()[0].pid, 0);
        assert_eq!(snap.memory.unwrap().usage_percent, 50.0);
    }

    #[test]
    fn oversized_count_saturates() {
        let snap: SystemSnapshot =
            serde_json::from_str(r#"{"processes": [{"pid": 1e12}]}"#).unwrap();
        assert_eq!(snap.processes.unwrap()[0].pid, u32::MAX);
    }

    #[test]
    fn malformed_record_does_not_sink_the_snapshot() {
        let snap: SystemSnapshot = serde_json::from_str(
            r#"{"cpu": {"usage": "high"}, "gpu": 7, "memory": {"usagePercent": 42.5},
                "disks": [{"name": "sda1", "total": 10}, {"name": 5}]}"#,
        )
        .unwrap();
        assert!(snap.cpu.is_none());
        assert!(snap.gpu.is_none());
        assert_eq!(snap.memory.unwrap().usage_percent, 42.5);
        let disks = snap.disks.unwrap();
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].name, "sda1");
    }

    #[test]
    fn null_core_usage_entries_read_as_zero() {
        let snap: SystemSnapshot =
            serde_json::from_str(r#"{"cpu": {"coreUsage": [12.5, null, 3]}}"#).unwrap();
        assert_eq!(snap.cpu.unwrap().core_usage, vec![12.5, 0.0, 3.0]);
    }

    #[test]
    fn absent_records_are_not_serialized() {
        let snap = SystemSnapshot {
            memory: Some(MemoryReport::default()),
            ..SystemSnapshot::default()
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"memory\""));
        assert!(!json.contains("\"gpu\""));
        assert!(json.contains("usagePercent"));
    }
}
