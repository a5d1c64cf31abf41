//! `Connection` over the write half of an axum WebSocket.

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::{SinkExt, stream::SplitSink};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{Connection, ConnectionId, Payload, TransportError};

pub type WsSink = SplitSink<WebSocket, Message>;

pub struct WebSocketConnection<S = WsSink> {
    id: ConnectionId,
    sink: Mutex<Option<S>>,
    /// Cancelled by the first `close`; the read half watches it.
    released: CancellationToken,
}

impl<S> WebSocketConnection<S> {
    pub fn new(id: ConnectionId, sink: S) -> Self {
        Self {
            id,
            sink: Mutex::new(Some(sink)),
            released: CancellationToken::new(),
        }
    }

    /// Token the read pump selects on so that closing the connection also
    /// stops reading from it.
    pub fn released(&self) -> CancellationToken {
        self.released.clone()
    }
}

#[async_trait]
impl<S> Connection for WebSocketConnection<S>
where
    S: futures_util::Sink<Message, Error = axum::Error> + Unpin + Send,
{
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    async fn send(&self, payload: &Payload) -> Result<(), TransportError> {
        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or(TransportError::Closed)?;
        sink.send(Message::text(payload.as_str().to_owned()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&self) {
        // Before any I/O: the close frame below may never finish on a stalled peer.
        self.released.cancel();

        let Some(mut sink) = self.sink.lock().await.take() else {
            return;
        };

        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: String::new().into(),
        };
        if let Err(e) = sink.send(Message::Close(Some(frame))).await {
            tracing::debug!(conn_id = %self.id, "close frame not sent: {}", e);
        }
        if let Err(e) = sink.close().await {
            tracing::debug!(conn_id = %self.id, "failed to close sink: {}", e);
        }
    }
}
