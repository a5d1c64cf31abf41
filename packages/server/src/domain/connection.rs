//! The transport seam as seen by the hub.

use async_trait::async_trait;

use super::{ConnectionId, Payload, error::TransportError};

/// Write side of a duplex message stream owned by the transport layer.
///
/// The hub only ever holds shared, non-owning handles to a connection for
/// membership and fan-out. Reading is done by the connection's read pump.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Transport-assigned identity, stable for the connection's lifetime.
    fn id(&self) -> &ConnectionId;

    /// Best-effort write of one text message.
    async fn send(&self, payload: &Payload) -> Result<(), TransportError>;

    /// Release the transport resource. Must be safe to call more than once.
    async fn close(&self);
}
