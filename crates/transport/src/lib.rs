//! Push transport between the collector and the dashboard: a TCP fan-out
//! server and an auto-reconnecting client speaking newline-delimited JSON
//! frames.

pub mod client;
pub mod events;
pub mod server;

pub use client::PushClient;
pub use events::{encode_frame, parse_frame, ErrorPayload, Frame, StatusPayload};
pub use server::{Publisher, PushServer};

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::state::MemoryReport;
    use monitor_core::{Message, SystemSnapshot};
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    async fn wait_for_clients(publisher: &Publisher, n: usize) {
        timeout(WAIT, async {
            while publisher.client_count() < n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("client never subscribed");
    }

    #[tokio::test]
    async fn client_receives_published_snapshot() {
        let server = PushServer::bind("127.0.0.1:0", StatusPayload::running(1000))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let publisher = server.publisher();
        tokio::spawn(server.run());

        let mut rx = PushClient::new(addr.to_string(), Duration::from_millis(50)).spawn_listener();
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Connected));

        wait_for_clients(&publisher, 1).await;
        let snapshot = SystemSnapshot {
            memory: Some(MemoryReport { usage_percent: 41.5, ..MemoryReport::default() }),
            ..SystemSnapshot::default()
        };
        assert_eq!(
            publisher.publish(&Frame::SystemUpdate(Box::new(snapshot.clone()))).unwrap(),
            1
        );
        publisher
            .publish(&Frame::Error(ErrorPayload { message: Some("gpu probe failed".into()) }))
            .unwrap();

        let msg = timeout(WAIT, rx.recv()).await.unwrap();
        assert_eq!(msg, Some(Message::SystemUpdate(Box::new(snapshot))));
        let msg = timeout(WAIT, rx.recv()).await.unwrap();
        assert_eq!(msg, Some(Message::Error(Some("gpu probe failed".into()))));
    }

    #[tokio::test]
    async fn publishing_without_clients_is_ok() {
        let server = PushServer::bind("127.0.0.1:0", StatusPayload::running(500))
            .await
            .unwrap();
        let publisher = server.publisher();
        let sent = publisher
            .publish(&Frame::SystemUpdate(Box::default()))
            .unwrap();
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn server_shutdown_reports_disconnect() {
        let server = PushServer::bind("127.0.0.1:0", StatusPayload::running(1000))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let publisher = server.publisher();
        let task = tokio::spawn(server.run());

        let mut rx = PushClient::new(addr.to_string(), Duration::from_secs(60)).spawn_listener();
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Connected));
        wait_for_clients(&publisher, 1).await;

        task.abort();
        drop(publisher);

        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Disconnected));
    }

    #[tokio::test]
    async fn last_frame_reaches_clients_before_shutdown_completes() {
        let server = PushServer::bind("127.0.0.1:0", StatusPayload::running(1000))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let publisher = server.publisher();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let mut rx = PushClient::new(addr.to_string(), Duration::from_secs(60)).spawn_listener();
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Connected));
        wait_for_clients(&publisher, 1).await;

        publisher
            .publish(&Frame::Error(ErrorPayload { message: Some("system monitor stopped".into()) }))
            .unwrap();
        drop(publisher);
        stop_tx.send(()).unwrap();
        timeout(WAIT, task).await.unwrap().unwrap();

        assert_eq!(
            timeout(WAIT, rx.recv()).await.unwrap(),
            Some(Message::Error(Some("system monitor stopped".into())))
        );
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Disconnected));
    }

    #[tokio::test]
    async fn client_reconnects_after_server_restart() {
        let server = PushServer::bind("127.0.0.1:0", StatusPayload::running(1000))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let publisher = server.publisher();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let mut rx = PushClient::new(addr.to_string(), Duration::from_millis(50)).spawn_listener();
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Connected));
        wait_for_clients(&publisher, 1).await;

        drop(publisher);
        stop_tx.send(()).unwrap();
        timeout(WAIT, task).await.unwrap().unwrap();
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Disconnected));

        let server = PushServer::bind(&addr.to_string(), StatusPayload::running(1000))
            .await
            .unwrap();
        let publisher = server.publisher();
        tokio::spawn(server.run());
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(Message::Connected));

        wait_for_clients(&publisher, 1).await;
        publisher.publish(&Frame::SystemUpdate(Box::default())).unwrap();
        assert!(matches!(
            timeout(WAIT, rx.recv()).await.unwrap(),
            Some(Message::SystemUpdate(_))
        ));
    }
}
