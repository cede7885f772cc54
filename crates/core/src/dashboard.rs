//! Dashboard controller: owns the per-metric rolling buffers and turns
//! incoming [`Message`]s into [`ViewUpdate`]s.
//!
//! [`Dashboard::handle`] is a reducer with no rendering side effects;
//! [`dispatch`] pairs it with a [`Surface`] and contains render failures.

use crate::event::Message;
use crate::format;
use crate::series::{time_label, DualSeries, SingleSeries};
use crate::state::{CpuReport, GpuReport, MemoryReport, NetworkReport, SystemSnapshot};
use crate::view::{
    render, ChartData, ChartId, ConnectionStatus, DiskRow, ElementId, ProcessRow, Redraw, Surface,
    ViewUpdate,
};
use chrono::Timelike;
use tracing::{debug, error, info, warn};

/// Per-core bars shown at most; the rest are summarised by total usage.
pub const CORE_BARS: usize = 8;

/// Controller state: one rolling buffer per charted metric stream.
///
/// Buffers only change through [`Dashboard::handle`].
#[derive(Debug, Clone)]
pub struct Dashboard {
    cpu:     SingleSeries,
    gpu:     SingleSeries,
    memory:  SingleSeries,
    /// Download (series 0) and upload (series 1).
    network: DualSeries,
    status:  ConnectionStatus,
}

impl Dashboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu:     SingleSeries::new(capacity),
            gpu:     SingleSeries::new(capacity),
            memory:  SingleSeries::new(capacity),
            network: DualSeries::new(capacity),
            status:  ConnectionStatus::default(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn cpu(&self) -> &SingleSeries {
        &self.cpu
    }

    pub fn gpu(&self) -> &SingleSeries {
        &self.gpu
    }

    pub fn memory(&self) -> &SingleSeries {
        &self.memory
    }

    pub fn network(&self) -> &DualSeries {
        &self.network
    }

    /// Apply one message received at `now` and return the view changes.
    pub fn handle(&mut self, message: Message, now: &impl Timelike) -> Vec<ViewUpdate> {
        debug!("handling {} event", message.kind());
        match message {
            Message::Connected => self.on_connected(),
            Message::Disconnected => self.on_disconnected(),
            Message::SystemUpdate(snapshot) => self.on_snapshot(&snapshot, &time_label(now)),
            Message::Error(message) => on_error(message),
        }
    }

    fn on_connected(&mut self) -> Vec<ViewUpdate> {
        info!("Connected to server");
        self.status = ConnectionStatus::Connected;
        vec![ViewUpdate::Status(self.status)]
    }

    fn on_disconnected(&mut self) -> Vec<ViewUpdate> {
        warn!("Disconnected from server");
        self.status = ConnectionStatus::Disconnected;
        vec![ViewUpdate::Status(self.status)]
    }

    fn on_snapshot(&mut self, snapshot: &SystemSnapshot, label: &str) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();

        if let Some(cpu) = &snapshot.cpu {
            self.update_cpu(cpu, label, &mut updates);
        }
        if let Some(gpu) = &snapshot.gpu {
            self.update_gpu(gpu, label, &mut updates);
        }
        if let Some(memory) = &snapshot.memory {
            self.update_memory(memory, label, &mut updates);
        }
        if let Some(network) = &snapshot.network {
            self.update_network(network, label, &mut updates);
        }
        if let Some(disks) = &snapshot.disks {
            let rows = disks
                .iter()
                .map(|d| DiskRow {
                    title:   format!("{} ({})", d.name, d.mount_point),
                    percent: d.usage_percent(),
                    used:    format::gigabytes(d.used),
                    free:    format::gigabytes(d.free),
                    io:      format!(
                        "R {}  W {}",
                        format::rate(d.read_speed),
                        format::rate(d.write_speed)
                    ),
                })
                .collect();
            updates.push(ViewUpdate::Disks(rows));
        }
        if let Some(processes) = &snapshot.processes {
            let rows = processes
                .iter()
                .map(|p| ProcessRow {
                    name:   p.name.clone(),
                    pid:    p.pid,
                    cpu:    format!("{:.1}", p.cpu_usage),
                    memory: format!("{:.1}", p.memory_usage),
                })
                .collect();
            updates.push(ViewUpdate::Processes(rows));
        }

        updates
    }

    fn update_cpu(&mut self, cpu: &CpuReport, label: &str, out: &mut Vec<ViewUpdate>) {
        out.push(text(ElementId::CpuUsage, format::percent(cpu.usage)));
        out.push(ViewUpdate::Fill { id: ElementId::CpuProgress, percent: cpu.usage });
        out.push(text(ElementId::CpuCores, cpu.cores.to_string()));
        out.push(text(ElementId::CpuFreq, format!("{:.0} MHz", cpu.frequency)));
        out.push(ViewUpdate::Cores(cpu.core_usage.iter().take(CORE_BARS).copied().collect()));

        self.cpu.append(label, [cpu.usage]);
        out.push(chart(ChartId::Cpu, self.cpu.snapshot().into()));
    }

    fn update_gpu(&mut self, gpu: &GpuReport, label: &str, out: &mut Vec<ViewUpdate>) {
        out.push(text(ElementId::GpuUsage, format::percent(gpu.usage)));
        out.push(ViewUpdate::Fill { id: ElementId::GpuProgress, percent: gpu.usage });
        out.push(text(ElementId::GpuName, gpu.name.clone()));
        out.push(text(
            ElementId::GpuMemory,
            format!("{:.0} / {:.0} MB", gpu.memory_used, gpu.memory_total),
        ));
        if gpu.temperature > 0.0 {
            out.push(text(ElementId::GpuTemp, format!("{:.1}°C", gpu.temperature)));
            out.push(ViewUpdate::Visible { id: ElementId::GpuTempItem, visible: true });
        }

        self.gpu.append(label, [gpu.usage]);
        out.push(chart(ChartId::Gpu, self.gpu.snapshot().into()));
    }

    fn update_memory(&mut self, memory: &MemoryReport, label: &str, out: &mut Vec<ViewUpdate>) {
        out.push(text(ElementId::MemUsage, format::percent(memory.usage_percent)));
        out.push(ViewUpdate::Fill { id: ElementId::MemProgress, percent: memory.usage_percent });
        out.push(text(ElementId::MemTotal, format::megabytes(memory.total)));
        out.push(text(ElementId::MemUsed, format::megabytes(memory.used)));
        out.push(text(ElementId::MemFree, format::megabytes(memory.free)));

        self.memory.append(label, [memory.usage_percent]);
        out.push(chart(ChartId::Memory, self.memory.snapshot().into()));
    }

    fn update_network(&mut self, network: &NetworkReport, label: &str, out: &mut Vec<ViewUpdate>) {
        out.push(text(ElementId::NetDownload, format::rate(network.download_speed)));
        out.push(text(ElementId::NetUpload, format::rate(network.upload_speed)));
        out.push(text(ElementId::NetConnections, network.active_connections.to_string()));

        self.network
            .append(label, [network.download_speed, network.upload_speed]);
        out.push(chart(ChartId::Network, self.network.snapshot().into()));
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(crate::series::DEFAULT_CAPACITY)
    }
}

fn on_error(message: Option<String>) -> Vec<ViewUpdate> {
    match message.filter(|m| !m.is_empty()) {
        Some(message) => {
            error!("Server error: {message}");
            vec![ViewUpdate::Alert(format!("Error: {message}"))]
        }
        None => {
            warn!("Server sent an error event without a message");
            Vec::new()
        }
    }
}

fn text(id: ElementId, text: String) -> ViewUpdate {
    ViewUpdate::Text { id, text }
}

fn chart(chart: ChartId, data: ChartData) -> ViewUpdate {
    ViewUpdate::Chart { chart, data, redraw: Redraw::Instant }
}

/// Top-level event handler: reduce, then render.
///
/// A render failure is logged and dropped; the buffers keep the new sample
/// and the dashboard carries on with the next message.
pub fn dispatch(
    dashboard: &mut Dashboard,
    surface: &mut impl Surface,
    message: Message,
    now: &impl Timelike,
) {
    let kind = message.kind();
    let updates = dashboard.handle(message, now);
    if let Err(e) = render(&updates, surface) {
        error!("Error updating view for {kind} event: {e}");
    }
}
