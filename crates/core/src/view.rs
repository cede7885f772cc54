use crate::error::Result;
use crate::series::SeriesSnapshot;

/// Connection indicator shown in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// Addressable text/gauge elements on the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    CpuUsage,
    CpuProgress,
    CpuCores,
    CpuFreq,
    GpuUsage,
    GpuProgress,
    GpuName,
    GpuMemory,
    GpuTemp,
    GpuTempItem,
    MemUsage,
    MemProgress,
    MemTotal,
    MemUsed,
    MemFree,
    NetDownload,
    NetUpload,
    NetConnections,
}

impl ElementId {
    /// Stable identifier used in logs and by surfaces keyed on strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CpuUsage => "cpu-usage",
            Self::CpuProgress => "cpu-progress",
            Self::CpuCores => "cpu-cores",
            Self::CpuFreq => "cpu-freq",
            Self::GpuUsage => "gpu-usage",
            Self::GpuProgress => "gpu-progress",
            Self::GpuName => "gpu-name",
            Self::GpuMemory => "gpu-memory",
            Self::GpuTemp => "gpu-temp",
            Self::GpuTempItem => "gpu-temp-item",
            Self::MemUsage => "mem-usage",
            Self::MemProgress => "mem-progress",
            Self::MemTotal => "mem-total",
            Self::MemUsed => "mem-used",
            Self::MemFree => "mem-free",
            Self::NetDownload => "net-download",
            Self::NetUpload => "net-upload",
            Self::NetConnections => "net-connections",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    Cpu,
    Gpu,
    Memory,
    Network,
}

impl ChartId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
            Self::Memory => "mem",
            Self::Network => "net",
        }
    }

    /// Dataset names, one per plotted series.
    pub fn series_names(&self) -> &'static [&'static str] {
        match self {
            Self::Cpu => &["CPU Usage"],
            Self::Gpu => &["GPU Usage"],
            Self::Memory => &["Memory Usage"],
            Self::Network => &["Download", "Upload"],
        }
    }

    /// Percentage charts have a fixed 0–100 axis; rate charts scale to data.
    pub fn fixed_max(&self) -> Option<f64> {
        match self {
            Self::Network => None,
            _ => Some(100.0),
        }
    }
}

/// How a chart should transition to its new data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Skip animation so the chart tracks live data.
    Instant,
}

/// Labels plus one or two value sequences, ready to plot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

impl ChartData {
    /// Largest plotted value, or 0 when empty.
    pub fn peak(&self) -> f64 {
        self.series
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

impl<const N: usize> From<SeriesSnapshot<N>> for ChartData {
    fn from(snap: SeriesSnapshot<N>) -> Self {
        Self {
            labels: snap.labels,
            series: snap.series.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiskRow {
    /// `"<name> (<mount point>)"`.
    pub title:   String,
    pub percent: f64,
    pub used:    String,
    pub free:    String,
    /// Read and write throughput, e.g. `"R 1.25 MB/s  W 0.00 MB/s"`.
    pub io:      String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub name:   String,
    pub pid:    u32,
    pub cpu:    String,
    pub memory: String,
}

/// One change to apply to the display surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Status(ConnectionStatus),
    Text { id: ElementId, text: String },
    /// Proportional fill in percent.
    Fill { id: ElementId, percent: f64 },
    Visible { id: ElementId, visible: bool },
    Chart { chart: ChartId, data: ChartData, redraw: Redraw },
    /// Per-core usage in percent, lowest core index first.
    Cores(Vec<f64>),
    Disks(Vec<DiskRow>),
    Processes(Vec<ProcessRow>),
    /// Blocking notification the user must dismiss.
    Alert(String),
}

/// Rendering sink for [`ViewUpdate`]s.
pub trait Surface {
    fn set_status(&mut self, status: ConnectionStatus) -> Result<()>;
    fn set_text(&mut self, id: ElementId, text: &str) -> Result<()>;
    fn set_fill(&mut self, id: ElementId, percent: f64) -> Result<()>;
    fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<()>;
    fn redraw_chart(&mut self, chart: ChartId, data: &ChartData, redraw: Redraw) -> Result<()>;
    fn replace_cores(&mut self, usage: &[f64]) -> Result<()>;
    fn replace_disks(&mut self, rows: &[DiskRow]) -> Result<()>;
    fn replace_processes(&mut self, rows: &[ProcessRow]) -> Result<()>;
    fn alert(&mut self, message: &str) -> Result<()>;
}

/// Apply `updates` in order, stopping at the first failure.
pub fn render(updates: &[ViewUpdate], surface: &mut impl Surface) -> Result<()> {
    for update in updates {
        match update {
            ViewUpdate::Status(status) => surface.set_status(*status)?,
            ViewUpdate::Text { id, text } => surface.set_text(*id, text)?,
            ViewUpdate::Fill { id, percent } => surface.set_fill(*id, *percent)?,
            ViewUpdate::Visible { id, visible } => surface.set_visible(*id, *visible)?,
            ViewUpdate::Chart { chart, data, redraw } => surface.redraw_chart(*chart, data, *redraw)?,
            ViewUpdate::Cores(usage) => surface.replace_cores(usage)?,
            ViewUpdate::Disks(rows) => surface.replace_disks(rows)?,
            ViewUpdate::Processes(rows) => surface.replace_processes(rows)?,
            ViewUpdate::Alert(message) => surface.alert(message)?,
        }
    }
    Ok(())
}
