//! Host sampling: turns `sysinfo` readings (plus `nvidia-smi` when present)
//! into [`SystemSnapshot`]s on a fixed interval.

pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod memory;
pub mod network;
pub mod process;

use gpu::GpuProbe;
use monitor_core::state::SystemSnapshot;
use std::time::{Duration, Instant};
use sysinfo::{Disks, Networks, System};
use tokio::sync::mpsc;
use tokio::time;

/// Owns the `sysinfo` handles between samples so rates can be computed from
/// per-refresh deltas.
pub struct Collector {
    sys:           System,
    networks:      Networks,
    disks:         Disks,
    gpu:           GpuProbe,
    top_processes: usize,
    last_sample:   Instant,
}

impl Collector {
    pub fn new(top_processes: usize) -> Self {
        Self {
            sys:           System::new_all(),
            networks:      Networks::new_with_refreshed_list(),
            disks:         Disks::new_with_refreshed_list(),
            gpu:           GpuProbe::new(),
            top_processes,
            last_sample:   Instant::now(),
        }
    }

    /// Refresh every source and build one snapshot.
    pub async fn sample(&mut self) -> SystemSnapshot {
        let elapsed = self.last_sample.elapsed().as_secs_f64();
        self.last_sample = Instant::now();

        self.sys.refresh_all();
        self.networks.refresh(true);
        self.disks.refresh(true);

        SystemSnapshot {
            cpu:       Some(cpu::collect(&self.sys)),
            gpu:       self.gpu.collect().await,
            memory:    Some(memory::collect(&self.sys)),
            network:   Some(network::collect(&self.networks, elapsed)),
            disks:     Some(disk::collect(&self.disks, elapsed)),
            processes: Some(process::collect(&self.sys, self.top_processes)),
        }
    }
}

/// Spawn a background Tokio task that samples the host every `interval_ms`
/// milliseconds and forwards [`SystemSnapshot`]s through the returned channel.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_monitor(interval_ms: u64, top_processes: usize) -> mpsc::Receiver<SystemSnapshot> {
    let (tx, rx) = mpsc::channel(4);
    let interval = Duration::from_millis(interval_ms.max(1));

    tokio::spawn(async move {
        let mut collector = Collector::new(top_processes);
        let mut ticker = time::interval(interval);

        loop {
            ticker.tick().await;
            let snapshot = collector.sample().await;

            if tx.send(snapshot).await.is_err() {
                tracing::debug!("snapshot receiver dropped; monitor stopping");
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_fills_host_records() {
        let mut collector = Collector::new(3);
        let snap = collector.sample().await;

        let cpu = snap.cpu.expect("cpu record");
        assert!(cpu.cores > 0);
        assert_eq!(cpu.core_usage.len(), cpu.cores as usize);
        assert!(snap.memory.expect("memory record").total > 0.0);
        assert!(snap.network.is_some());
        assert!(snap.processes.expect("process list").len() <= 3);
    }

    #[tokio::test]
    async fn monitor_stops_when_receiver_dropped() {
        let mut rx = spawn_monitor(10, 1);
        assert!(rx.recv().await.is_some());
        drop(rx);
    }
}
