use crate::events::{encode_frame, Frame, StatusPayload};
use monitor_core::{McError, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Frames buffered per client before a slow reader starts skipping.
const CLIENT_BACKLOG: usize = 16;

/// Push server: accepts TCP clients and fans every published frame out to
/// all of them as newline-delimited JSON.
pub struct PushServer {
    listener: TcpListener,
    frames:   broadcast::Sender<Arc<str>>,
    status:   StatusPayload,
}

/// Cloneable handle for publishing frames to every connected client.
#[derive(Clone)]
pub struct Publisher {
    frames: broadcast::Sender<Arc<str>>,
}

impl PushServer {
    /// Bind the listening socket.  `status` is sent to each client on connect.
    pub async fn bind(addr: &str, status: StatusPayload) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| McError::Transport(format!("bind {addr}: {e}")))?;
        let (frames, _) = broadcast::channel(CLIENT_BACKLOG);

        Ok(Self { listener, frames, status })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn publisher(&self) -> Publisher {
        Publisher { frames: self.frames.clone() }
    }

    /// Accept clients until the task is dropped.
    pub async fn run(self) {
        self.run_until(std::future::pending()).await
    }

    /// Accept clients until `shutdown` resolves, then stop accepting and wait
    /// for every client to drain the frames already published.
    ///
    /// Clients finish once all [`Publisher`]s are dropped too, so drop them
    /// before (or while) awaiting this.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        let greeting: Option<Arc<str>> = match encode_frame(&Frame::Status(self.status.clone())) {
            Ok(line) => Some(line.into()),
            Err(e) => {
                error!("Cannot encode status frame: {e}");
                None
            }
        };

        let Self { listener, frames, .. } = self;
        let mut clients = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!("Client connected: {peer}");
                        clients.spawn(serve_client(stream, peer, greeting.clone(), frames.subscribe()));
                    }
                    Err(e) => warn!("Accept failed: {e}"),
                },
                Some(_) = clients.join_next(), if !clients.is_empty() => {}
            }
        }

        info!("Push server shutting down; draining {} client(s)", clients.len());
        drop(listener);
        drop(frames);
        while clients.join_next().await.is_some() {}
    }
}

impl Publisher {
    /// Send `frame` to every connected client.  Returns how many clients
    /// were subscribed; publishing with none connected is not an error.
    pub fn publish(&self, frame: &Frame) -> Result<usize> {
        let line: Arc<str> = encode_frame(frame)?.into();
        Ok(self.frames.send(line).unwrap_or(0))
    }

    pub fn client_count(&self) -> usize {
        self.frames.receiver_count()
    }
}

async fn serve_client(
    mut stream: TcpStream,
    peer: SocketAddr,
    greeting: Option<Arc<str>>,
    mut frames: broadcast::Receiver<Arc<str>>,
) {
    if let Some(line) = greeting {
        if let Err(e) = write_line(&mut stream, &line).await {
            info!("Client {peer} dropped before greeting: {e}");
            return;
        }
    }

    loop {
        match frames.recv().await {
            Ok(line) => {
                if let Err(e) = write_line(&mut stream, &line).await {
                    info!("Client {peer} disconnected: {e}");
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Client {peer} lagging; skipped {skipped} frames");
            }
            Err(RecvError::Closed) => {
                debug!("Publisher gone; closing {peer}");
                break;
            }
        }
    }
}

async fn write_line(stream: &mut TcpStream, line: &str) -> std::io::Result<()> {
    stream.write_all(line.as_bytes()).await?;
    stream.write_all(b"\n").await
}
