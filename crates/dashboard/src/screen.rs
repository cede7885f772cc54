use monitor_core::view::{
    ChartData, ChartId, ConnectionStatus, DiskRow, ElementId, ProcessRow, Redraw, Surface,
};
use monitor_core::{McError, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Shown for elements that have not received a value yet.
pub const PLACEHOLDER: &str = "--";

/// Pending alerts kept at most; older ones are dropped first.
pub const MAX_ALERTS: usize = 8;

/// Retained model of everything the terminal draws.
///
/// The controller writes into it through [`Surface`]; `ui::render` reads it
/// once per frame.
#[derive(Debug, Default)]
pub struct Screen {
    status:    ConnectionStatus,
    texts:     HashMap<ElementId, String>,
    fills:     HashMap<ElementId, f64>,
    visible:   HashSet<ElementId>,
    charts:    HashMap<ChartId, ChartData>,
    cores:     Vec<f64>,
    disks:     Vec<DiskRow>,
    processes: Vec<ProcessRow>,
    alerts:    VecDeque<String>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.texts.get(&id).map(String::as_str).unwrap_or(PLACEHOLDER)
    }

    /// Fill ratio in `[0, 1]`.
    pub fn ratio(&self, id: ElementId) -> f64 {
        self.fills.get(&id).copied().unwrap_or(0.0) / 100.0
    }

    /// Elements are hidden until made visible.
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.visible.contains(&id)
    }

    pub fn chart(&self, id: ChartId) -> Option<&ChartData> {
        self.charts.get(&id)
    }

    /// Per-core usage in percent.
    pub fn cores(&self) -> &[f64] {
        &self.cores
    }

    pub fn disks(&self) -> &[DiskRow] {
        &self.disks
    }

    pub fn processes(&self) -> &[ProcessRow] {
        &self.processes
    }

    /// The alert currently blocking input, if any.
    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }
}

impl Surface for Screen {
    fn set_status(&mut self, status: ConnectionStatus) -> Result<()> {
        self.status = status;
        Ok(())
    }

    fn set_text(&mut self, id: ElementId, text: &str) -> Result<()> {
        self.texts.insert(id, text.to_string());
        Ok(())
    }

    fn set_fill(&mut self, id: ElementId, percent: f64) -> Result<()> {
        if !percent.is_finite() {
            return Err(McError::Render(format!("non-finite fill {percent} for {id}")));
        }
        self.fills.insert(id, percent.clamp(0.0, 100.0));
        Ok(())
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<()> {
        if visible {
            self.visible.insert(id);
        } else {
            self.visible.remove(&id);
        }
        Ok(())
    }

    fn redraw_chart(&mut self, chart: ChartId, data: &ChartData, _redraw: Redraw) -> Result<()> {
        // Frames are redrawn whole on every tick, so there is no animation to skip.
        if data.series.len() != chart.series_names().len() {
            return Err(McError::Render(format!(
                "chart '{}' expects {} series, got {}",
                chart.as_str(),
                chart.series_names().len(),
                data.series.len()
            )));
        }
        if data.series.iter().flatten().any(|v| !v.is_finite()) {
            return Err(McError::Render(format!("non-finite value in chart '{}'", chart.as_str())));
        }
        self.charts.insert(chart, data.clone());
        Ok(())
    }

    fn replace_cores(&mut self, usage: &[f64]) -> Result<()> {
        if usage.iter().any(|v| !v.is_finite()) {
            return Err(McError::Render("non-finite per-core usage".into()));
        }
        self.cores = usage.iter().map(|v| v.clamp(0.0, 100.0)).collect();
        Ok(())
    }

    fn replace_disks(&mut self, rows: &[DiskRow]) -> Result<()> {
        self.disks = rows.to_vec();
        Ok(())
    }

    fn replace_processes(&mut self, rows: &[ProcessRow]) -> Result<()> {
        self.processes = rows.to_vec();
        Ok(())
    }

    /// Repeats of the newest pending alert are collapsed.
    fn alert(&mut self, message: &str) -> Result<()> {
        if self.alerts.back().is_some_and(|last| last == message) {
            return Ok(());
        }
        if self.alerts.len() == MAX_ALERTS {
            self.alerts.pop_front();
        }
        self.alerts.push_back(message.to_string());
        Ok(())
    }
}
