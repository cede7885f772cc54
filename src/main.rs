//! monitorcore: samples host metrics and pushes them to connected dashboards.
//!
//! Run with:  `RUST_LOG=info monitorcore --bind 0.0.0.0:5000`

use anyhow::Result;
use clap::Parser;
use monitor_transport::{ErrorPayload, Frame, PushServer, StatusPayload};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

/// How long clients get to receive the final frames before the process exits.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "monitorcore", version, about = "System metrics collector and push server")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/monitorcore/monitorcore.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("monitorcore v{} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(monitor_config::default_path);
    let mut config = monitor_config::load(&config_path)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let interval_ms = config.collector.interval_ms;
    let server = PushServer::bind(&config.server.bind, StatusPayload::running(interval_ms)).await?;
    tracing::info!("Listening on {}", server.local_addr()?);
    let publisher = server.publisher();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(server.run_until(async {
        let _ = stop_rx.await;
    }));

    let mut snapshots =
        monitor_system::spawn_monitor(interval_ms, config.collector.top_processes);

    while let Some(snapshot) = snapshots.recv().await {
        match publisher.publish(&Frame::SystemUpdate(Box::new(snapshot))) {
            Ok(n) => tracing::trace!("Snapshot sent to {n} client(s)"),
            Err(e) => tracing::error!("Cannot publish snapshot: {e}"),
        }
    }

    tracing::error!("System monitor stopped");
    let stopped = Frame::Error(ErrorPayload { message: Some("system monitor stopped".into()) });
    if let Err(e) = publisher.publish(&stopped) {
        tracing::error!("Cannot publish error frame: {e}");
    }

    drop(publisher);
    let _ = stop_tx.send(());
    if tokio::time::timeout(SHUTDOWN_GRACE, server_task).await.is_err() {
        tracing::warn!("Clients did not drain within {SHUTDOWN_GRACE:?}; exiting anyway");
    }
    Ok(())
}
