//! monitorcore-dashboard: terminal dashboard for a running `monitorcore`
//! collector.
//!
//! Logs go to a file because the terminal belongs to the UI:
//!   `RUST_LOG=debug monitorcore-dashboard --log-file /tmp/dash.log`

mod app;
mod screen;
mod ui;

use anyhow::Context;
use clap::Parser;
use monitor_transport::PushClient;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "monitorcore-dashboard", version, about = "Live system metrics dashboard")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/monitorcore/monitorcore.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Push server address, overriding `dashboard.server`
    #[arg(short, long)]
    server: Option<String>,

    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file '{}'", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .unwrap_or_else(|| std::env::temp_dir().join("monitorcore-dashboard.log"));
    init_logging(&log_file)?;
    tracing::info!("monitorcore-dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.unwrap_or_else(monitor_config::default_path);
    let mut config = monitor_config::load(&config_path)?;
    if let Some(server) = cli.server {
        config.dashboard.server = server;
    }
    monitor_config::validate(&config)?;

    let client = PushClient::new(
        config.dashboard.server.clone(),
        Duration::from_secs(config.dashboard.reconnect_secs),
    );
    tracing::info!("Connecting to {}", client.addr());
    let messages = client.spawn_listener();

    let mut terminal = ratatui::init();
    let mut app = app::App::new(config.dashboard.history_capacity);
    let result = app.run(&mut terminal, messages).await;

    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!("Dashboard exited with error: {e:#}");
    }
    result
}
