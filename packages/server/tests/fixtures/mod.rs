//! Test fixtures: a hub served on an ephemeral port plus WebSocket helpers.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use fanout_server::{ServerConfig, serve};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = serve(listener, config, shutdown).await {
                panic!("test server failed: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> WsStream {
        let (ws, _) = tokio::time::timeout(TIMEOUT, connect_async(self.ws_url()))
            .await
            .expect("Timed out connecting")
            .expect("Failed to connect");
        ws
    }

    /// Poll `/api/stats` until the hub reports `expected` connections.
    pub async fn wait_for_connections(&self, expected: u64) {
        let client = reqwest::Client::new();
        let url = format!("{}/api/stats", self.base_url());
        let deadline = tokio::time::Instant::now() + TIMEOUT;
        loop {
            let body: serde_json::Value = client
                .get(&url)
                .send()
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse JSON");
            if body["connections"] == expected {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "hub never reached {expected} connections (last: {body})"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            tokio::time::timeout(TIMEOUT, task)
                .await
                .expect("Timed out stopping server")
                .expect("Server task panicked");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn send_text(ws: &mut WsStream, text: &str) {
    ws.send(Message::text(text.to_string()))
        .await
        .expect("Failed to send text");
}

/// Next text frame, skipping control frames.
pub async fn recv_text(ws: &mut WsStream) -> String {
    loop {
        let msg = tokio::time::timeout(TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for message")
            .expect("Stream ended")
            .expect("WebSocket error");
        match msg {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Close(frame) => panic!("connection closed: {frame:?}"),
            _ => continue,
        }
    }
}

/// Assert that nothing but control frames arrives within `window`.
pub async fn assert_silent(ws: &mut WsStream, window: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(window, ws.next()).await {
        panic!("unexpected message: {}", text.as_str());
    }
}
