use crate::events::{parse_frame, Frame};
use monitor_core::Message;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Push client.
///
/// Connects to a [`PushServer`](crate::PushServer) and streams typed
/// [`Message`]s.  Automatically reconnects if the connection drops.
pub struct PushClient {
    addr:  String,
    retry: Duration,
}

impl PushClient {
    pub fn new(addr: impl Into<String>, retry: Duration) -> Self {
        Self { addr: addr.into(), retry }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Spawn a background task that reads frames from the server and forwards
    /// dashboard messages on the returned channel.
    ///
    /// `Disconnected` is only sent after a `Connected`.  The task ends when
    /// the receiver is dropped.
    pub fn spawn_listener(self) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            loop {
                match TcpStream::connect(&self.addr).await {
                    Ok(stream) => {
                        info!("Connected to push server at {}", self.addr);
                        if tx.send(Message::Connected).await.is_err() {
                            return;
                        }

                        let mut lines = BufReader::new(stream).lines();
                        loop {
                            match lines.next_line().await {
                                Ok(Some(line)) => {
                                    if let Some(msg) = decode_line(&line) {
                                        if tx.send(msg).await.is_err() {
                                            return; // all receivers dropped
                                        }
                                    }
                                }
                                Ok(None) => break,
                                Err(e) => {
                                    warn!("Read from push server failed: {e}");
                                    break;
                                }
                            }
                        }

                        if tx.send(Message::Disconnected).await.is_err() {
                            return;
                        }
                        warn!(
                            "Push connection lost; reconnecting in {}s…",
                            self.retry.as_secs_f32()
                        );
                    }
                    Err(e) => {
                        error!(
                            "Cannot connect to {}: {e}; retrying in {}s…",
                            self.addr,
                            self.retry.as_secs_f32()
                        );
                    }
                }

                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(self.retry).await;
            }
        });

        rx
    }
}

/// Map one wire line to a dashboard message, logging anything that is not one.
fn decode_line(line: &str) -> Option<Message> {
    if line.trim().is_empty() {
        return None;
    }

    match parse_frame(line) {
        Ok(Frame::Status(status)) => {
            info!(
                "Server {} v{} (interval {} ms)",
                status.status, status.version, status.interval_ms
            );
            None
        }
        Ok(Frame::Unknown(event)) => {
            debug!("Ignoring unknown event '{event}'");
            None
        }
        Ok(frame) => frame.into_message(),
        Err(e) => {
            warn!("Dropping malformed frame: {e}");
            None
        }
    }
}
