use monitor_core::view::{ChartData, ChartId, ConnectionStatus, ElementId};
use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

use crate::screen::Screen;

// -- Color Palette --

pub const COLOR_ACCENT: Color = Color::Rgb(220, 38, 38);
pub const COLOR_ACCENT_LIGHT: Color = Color::Rgb(239, 68, 68);
pub const COLOR_TEXT: Color = Color::White;
pub const COLOR_DIM: Color = Color::DarkGray;
pub const COLOR_GOOD: Color = Color::Green;

/// Root render dispatcher
pub fn render(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),        // Header
            Constraint::Percentage(32),   // CPU + GPU
            Constraint::Percentage(32),   // Memory + Network
            Constraint::Min(6),           // Disks + processes
        ])
        .split(area);

    render_header(frame, screen, chunks[0]);

    let [cpu, gpu] = halves(chunks[1]);
    render_cpu(frame, screen, cpu);
    render_gpu(frame, screen, gpu);

    let [mem, net] = halves(chunks[2]);
    render_memory(frame, screen, mem);
    render_network(frame, screen, net);

    let [disks, procs] = halves(chunks[3]);
    render_disks(frame, screen, disks);
    render_processes(frame, screen, procs);

    if let Some(message) = screen.current_alert() {
        render_alert(frame, message, area);
    }
}

fn halves(area: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area)
}

fn render_header(frame: &mut Frame, screen: &Screen, area: Rect) {
    let status = screen.status();
    let dot = match status {
        ConnectionStatus::Connected => COLOR_GOOD,
        ConnectionStatus::Connecting => COLOR_DIM,
        ConnectionStatus::Disconnected => COLOR_ACCENT,
    };

    let line = Line::from(vec![
        Span::styled(
            " MonitorCore ",
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{25CF} ", Style::default().fg(dot)),
        Span::styled(status.label(), Style::default().fg(COLOR_TEXT)),
        Span::styled("   q quit", Style::default().fg(COLOR_DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_DIM))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ))
}

fn metric_line<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(COLOR_DIM)),
        Span::styled(value, Style::default().fg(COLOR_TEXT)),
    ])
}

/// Text lines, then a usage gauge, then the history chart.
fn render_metric_panel(
    frame: &mut Frame,
    screen: &Screen,
    area: Rect,
    title: &str,
    lines: Vec<Line<'_>>,
    gauge: Option<(ElementId, ElementId)>,
    chart: ChartId,
) {
    let block = panel(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let gauge_height = u16::from(gauge.is_some());
    let [text_area, gauge_area, chart_area] = Layout::vertical([
        Constraint::Length(lines.len() as u16),
        Constraint::Length(gauge_height),
        Constraint::Min(3),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(lines), text_area);

    if let Some((fill_id, label_id)) = gauge {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(COLOR_ACCENT).bg(Color::Black))
            .ratio(screen.ratio(fill_id).clamp(0.0, 1.0))
            .label(screen.text(label_id).to_string());
        frame.render_widget(gauge, gauge_area);
    }

    render_chart(frame, chart_area, chart, screen.chart(chart));
}

fn render_cpu(frame: &mut Frame, screen: &Screen, area: Rect) {
    let area = if screen.cores().is_empty() {
        area
    } else {
        let [main, cores] =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(24)]).areas(area);
        render_cores(frame, screen.cores(), cores);
        main
    };

    let lines = vec![
        metric_line("Cores", screen.text(ElementId::CpuCores)),
        metric_line("Frequency", screen.text(ElementId::CpuFreq)),
    ];
    render_metric_panel(
        frame,
        screen,
        area,
        "CPU",
        lines,
        Some((ElementId::CpuProgress, ElementId::CpuUsage)),
        ChartId::Cpu,
    );
}

fn render_cores(frame: &mut Frame, cores: &[f64], area: Rect) {
    let lines: Vec<Line<'_>> = cores
        .iter()
        .enumerate()
        .map(|(i, usage)| {
            Line::from(vec![
                Span::styled(format!("{i:>2} "), Style::default().fg(COLOR_DIM)),
                Span::styled(usage_bar(*usage, 10), Style::default().fg(COLOR_ACCENT)),
                Span::styled(format!(" {usage:>5.1}%"), Style::default().fg(COLOR_TEXT)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Cores")), area);
}

fn render_gpu(frame: &mut Frame, screen: &Screen, area: Rect) {
    let mut lines = vec![
        metric_line("Name", screen.text(ElementId::GpuName)),
        metric_line("Memory", screen.text(ElementId::GpuMemory)),
    ];
    if screen.is_visible(ElementId::GpuTempItem) {
        lines.push(metric_line("Temperature", screen.text(ElementId::GpuTemp)));
    }
    render_metric_panel(
        frame,
        screen,
        area,
        "GPU",
        lines,
        Some((ElementId::GpuProgress, ElementId::GpuUsage)),
        ChartId::Gpu,
    );
}

fn render_memory(frame: &mut Frame, screen: &Screen, area: Rect) {
    let lines = vec![
        metric_line("Total", screen.text(ElementId::MemTotal)),
        metric_line("Used", screen.text(ElementId::MemUsed)),
        metric_line("Free", screen.text(ElementId::MemFree)),
    ];
    render_metric_panel(
        frame,
        screen,
        area,
        "Memory",
        lines,
        Some((ElementId::MemProgress, ElementId::MemUsage)),
        ChartId::Memory,
    );
}

fn render_network(frame: &mut Frame, screen: &Screen, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("\u{2193} ", Style::default().fg(COLOR_ACCENT)),
            Span::styled(screen.text(ElementId::NetDownload), Style::default().fg(COLOR_TEXT)),
            Span::styled("   \u{2191} ", Style::default().fg(COLOR_TEXT)),
            Span::styled(screen.text(ElementId::NetUpload), Style::default().fg(COLOR_TEXT)),
        ]),
        metric_line("Connections", screen.text(ElementId::NetConnections)),
    ];
    render_metric_panel(frame, screen, area, "Network", lines, None, ChartId::Network);
}

fn series_color(index: usize) -> Color {
    match index {
        0 => COLOR_ACCENT,
        _ => COLOR_TEXT,
    }
}

fn render_chart(frame: &mut Frame, area: Rect, chart: ChartId, data: Option<&ChartData>) {
    let Some(data) = data.filter(|d| !d.labels.is_empty()) else {
        let waiting = Paragraph::new(Span::styled("waiting for data…", Style::default().fg(COLOR_DIM)))
            .alignment(Alignment::Center);
        frame.render_widget(waiting, area);
        return;
    };

    let points: Vec<Vec<(f64, f64)>> = data
        .series
        .iter()
        .map(|s| s.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect())
        .collect();

    let datasets: Vec<Dataset<'_>> = points
        .iter()
        .zip(chart.series_names())
        .enumerate()
        .map(|(i, (pts, name))| {
            Dataset::default()
                .name(*name)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(pts)
        })
        .collect();

    let y_max = chart.fixed_max().unwrap_or_else(|| nice_ceiling(data.peak()));
    let x_max = (data.labels.len().saturating_sub(1)).max(1) as f64;
    let first = data.labels.first().cloned().unwrap_or_default();
    let last = data.labels.last().cloned().unwrap_or_default();

    let widget = Chart::new(datasets)
        .legend_position(None)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(COLOR_DIM))
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(COLOR_DIM))
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{y_max:.1}"))]),
        );
    frame.render_widget(widget, area);
}

/// Upper axis bound for rate charts: 20% headroom, never below 1.
fn nice_ceiling(peak: f64) -> f64 {
    (peak * 1.2).max(1.0)
}

fn usage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}

fn render_disks(frame: &mut Frame, screen: &Screen, area: Rect) {
    let mut lines = Vec::new();
    for disk in screen.disks() {
        lines.push(Line::from(vec![
            Span::styled(disk.title.clone(), Style::default().fg(COLOR_TEXT)),
            Span::styled(format!("  {:.1}%", disk.percent), Style::default().fg(COLOR_ACCENT)),
            Span::styled(format!("  {}", disk.io), Style::default().fg(COLOR_DIM)),
        ]));
        lines.push(Line::from(vec![
            Span::styled(usage_bar(disk.percent, 20), Style::default().fg(COLOR_ACCENT)),
            Span::styled(
                format!("  Used: {}  Free: {}", disk.used, disk.free),
                Style::default().fg(COLOR_DIM),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel("Disks"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_processes(frame: &mut Frame, screen: &Screen, area: Rect) {
    let header = Row::new(vec!["Name", "PID", "CPU %", "Memory (MB)"])
        .style(Style::default().fg(COLOR_DIM).add_modifier(Modifier::BOLD));

    let rows: Vec<Row<'_>> = screen
        .processes()
        .iter()
        .map(|p| {
            Row::new(vec![
                p.name.clone(),
                p.pid.to_string(),
                p.cpu.clone(),
                p.memory.clone(),
            ])
            .style(Style::default().fg(COLOR_TEXT))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(46),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(panel("Top Processes"));
    frame.render_widget(table, area);
}

fn render_alert(frame: &mut Frame, message: &str, area: Rect) {
    let [center_y] = Layout::vertical([Constraint::Length(6)])
        .flex(Flex::Center)
        .areas(area);
    let [center] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(center_y);

    let text = vec![
        Line::from(Span::styled(message, Style::default().fg(COLOR_TEXT))),
        Line::from(""),
        Line::from(Span::styled("Press Enter to dismiss", Style::default().fg(COLOR_DIM))),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_ACCENT_LIGHT))
                .title(" Error "),
        );

    frame.render_widget(Clear, center);
    frame.render_widget(popup, center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::view::{DiskRow, ProcessRow, Redraw, Surface};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(screen: &Screen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
        terminal.draw(|frame| render(frame, screen)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn empty_screen_renders_placeholders() {
        let out = draw(&Screen::new());
        assert!(out.contains("MonitorCore"));
        assert!(out.contains("Connecting"));
        assert!(out.contains("waiting for data"));
    }

    #[test]
    fn populated_screen_renders_values() {
        let mut screen = Screen::new();
        screen.set_status(ConnectionStatus::Connected).unwrap();
        screen.set_text(ElementId::CpuCores, "16").unwrap();
        screen.set_text(ElementId::CpuUsage, "42.0%").unwrap();
        screen.set_fill(ElementId::CpuProgress, 42.0).unwrap();
        screen
            .redraw_chart(
                ChartId::Network,
                &ChartData {
                    labels: vec!["1:1".into(), "1:2".into()],
                    series: vec![vec![0.5, 1.5], vec![0.1, 0.2]],
                },
                Redraw::Instant,
            )
            .unwrap();
        screen
            .replace_disks(&[DiskRow {
                title: "sda1 (/boot)".into(),
                percent: 25.0,
                used: "1.00 GB".into(),
                free: "3.00 GB".into(),
                io: "R 0.50 MB/s  W 0.00 MB/s".into(),
            }])
            .unwrap();
        screen
            .replace_processes(&[ProcessRow {
                name: "postgres".into(),
                pid: 812,
                cpu: "12.3".into(),
                memory: "256.0".into(),
            }])
            .unwrap();

        screen.replace_cores(&[12.5, 87.0]).unwrap();

        let out = draw(&screen);
        assert!(out.contains("Connected"));
        assert!(out.contains(" 87.0%"));
        assert!(out.contains("R 0.50 MB/s"));
        assert!(out.contains("42.0%"));
        assert!(out.contains("sda1 (/boot)"));
        assert!(out.contains("postgres"));
    }

    #[test]
    fn alert_is_drawn_on_top() {
        let mut screen = Screen::new();
        screen.alert("Error: monitor stopped").unwrap();
        let out = draw(&screen);
        assert!(out.contains("Error: monitor stopped"));
        assert!(out.contains("Press Enter to dismiss"));
    }

    #[test]
    fn usage_bar_width_is_fixed() {
        assert_eq!(usage_bar(50.0, 10).chars().count(), 10);
        assert_eq!(usage_bar(150.0, 4), "\u{2588}".repeat(4));
    }

    #[test]
    fn rate_axis_has_headroom() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(10.0), 12.0);
    }
}
