//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{Connection, ConnectionId, ConnectionIdFactory, Payload},
    infrastructure::transport::WebSocketConnection,
    ui::state::AppState,
    usecase::HubHandle,
};

pub async fn websocket_handler(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match upgrade {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state)),
        Err(rejection) => {
            tracing::debug!("rejecting non-upgrade request: {}", rejection);
            StatusCode::UPGRADE_REQUIRED.into_response()
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = ConnectionIdFactory::generate();
    let (sender, receiver) = socket.split();
    let connection = Arc::new(WebSocketConnection::new(id.clone(), sender));

    if let Err(e) = state.hub.register(connection.clone()) {
        tracing::warn!(conn_id = %id, "cannot register connection: {}", e);
        connection.close().await;
        return;
    }

    let exit = read_pump(&id, receiver, &state.hub, &connection.released()).await;
    tracing::debug!(conn_id = %id, ?exit, "read pump stopped");

    connection.close().await;
    tracing::debug!(conn_id = %id, "connection released");
}

/// Why a read pump stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PumpExit {
    /// Close frame received
    Closed,
    /// Stream ended without a close frame
    Ended,
    /// Read failed (abnormal closure, protocol error, ...)
    ReadError,
    /// The coordinator is gone
    HubStopped,
    /// The connection was closed from the hub side (evicted or shutting down)
    Released,
}

/// Turn inbound frames into hub events until the stream fails or closes.
///
/// Text frames become broadcasts. Other data frames are ignored. The pump
/// also stops as soon as `released` is cancelled, which happens when the
/// connection is closed. On exit exactly one unregister is emitted. The pump
/// never writes to its own connection.
pub(crate) async fn read_pump<S>(
    id: &ConnectionId,
    mut receiver: S,
    hub: &HubHandle,
    released: &CancellationToken,
) -> PumpExit
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let exit = loop {
        let next = tokio::select! {
            biased;
            _ = released.cancelled() => break PumpExit::Released,
            next = receiver.next() => next,
        };
        let msg = match next {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!(conn_id = %id, "error reading message: {}", e);
                break PumpExit::ReadError;
            }
            None => break PumpExit::Ended,
        };

        match msg {
            Message::Text(text) => {
                tracing::trace!(conn_id = %id, len = text.as_str().len(), "received text");
                if hub
                    .broadcast(Some(id.clone()), Payload::from(text.as_str()))
                    .is_err()
                {
                    break PumpExit::HubStopped;
                }
            }
            Message::Close(frame) => {
                tracing::debug!(conn_id = %id, ?frame, "client requested close");
                break PumpExit::Closed;
            }
            Message::Binary(_) => {
                tracing::debug!(conn_id = %id, "ignoring binary message");
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
        }
    };

    if let Err(e) = hub.unregister(id.clone()) {
        tracing::debug!(conn_id = %id, "unregister not delivered: {}", e);
    }
    exit
}
