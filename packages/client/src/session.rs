//! One client session over an established WebSocket.

use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::tungstenite::{
    self, Message,
    protocol::{CloseFrame, frame::coding::CloseCode},
};
use tokio_util::sync::CancellationToken;

use crate::{console::ConsoleInput, error::ClientError};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The hub closed the connection or the read side failed
    ServerClosed,
    /// Cancelled (Ctrl+C); a close frame was sent
    Interrupted,
    /// Console input ended; a close frame was sent
    InputClosed,
}

/// Relay console input to the hub and hub messages to `output`.
///
/// Cancelling `shutdown` starts the close handshake: a normal-closure frame is
/// sent and the session waits at most `close_grace` for the hub's reply.
pub async fn run_session<S>(
    ws: S,
    input: &mut mpsc::Receiver<ConsoleInput>,
    shutdown: CancellationToken,
    close_grace: Duration,
    output: mpsc::UnboundedSender<String>,
) -> Result<SessionEnd, ClientError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>>
        + Sink<Message, Error = tungstenite::Error>
        + Unpin
        + Send
        + 'static,
{
    let (mut sink, stream) = ws.split();
    let mut receiver = tokio::spawn(receive_loop(stream, output));

    loop {
        tokio::select! {
            _ = &mut receiver => return Ok(SessionEnd::ServerClosed),
            _ = shutdown.cancelled() => {
                tracing::info!("interrupt");
                close_gracefully(&mut sink, receiver, close_grace).await;
                return Ok(SessionEnd::Interrupted);
            }
            next = input.recv() => match next {
                Some(ConsoleInput::Line(line)) => {
                    if let Err(e) = sink.send(Message::text(line)).await {
                        receiver.abort();
                        return Err(ClientError::Write(Box::new(e)));
                    }
                }
                Some(ConsoleInput::Interrupted) => shutdown.cancel(),
                Some(ConsoleInput::Eof) | None => {
                    close_gracefully(&mut sink, receiver, close_grace).await;
                    return Ok(SessionEnd::InputClosed);
                }
            },
        }
    }
}

async fn receive_loop<S>(mut stream: S, output: mpsc::UnboundedSender<String>)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if output.send(text.as_str().to_owned()).is_err() {
                    break;
                }
            }
            Ok(Message::Close(frame)) => {
                tracing::debug!(?frame, "server closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("read: {}", e);
                break;
            }
        }
    }
}

async fn close_gracefully<K>(sink: &mut K, mut receiver: JoinHandle<()>, grace: Duration)
where
    K: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let frame = CloseFrame {
        code: CloseCode::Normal,
        reason: String::new().into(),
    };
    if let Err(e) = sink.send(Message::Close(Some(frame))).await {
        tracing::warn!("write close: {}", e);
        receiver.abort();
        return;
    }

    if tokio::time::timeout(grace, &mut receiver).await.is_err() {
        tracing::debug!("no close acknowledgement within {:?}", grace);
        receiver.abort();
    }
}
