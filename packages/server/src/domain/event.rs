//! Events consumed by the broadcast coordinator.

use std::{fmt, sync::Arc};

use super::{ConnectionId, Payload, connection::Connection};

/// One entry of the hub's single FIFO event stream.
pub enum HubEvent {
    /// A connection was accepted and wants to receive broadcasts.
    Register(Arc<dyn Connection>),
    /// A connection's read pump ended.
    Unregister(ConnectionId),
    /// A text message to fan out. `origin` is the connection it was read from.
    Broadcast {
        origin: Option<ConnectionId>,
        payload: Payload,
    },
}

impl fmt::Debug for HubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubEvent::Register(connection) => {
                f.debug_tuple("Register").field(connection.id()).finish()
            }
            HubEvent::Unregister(id) => f.debug_tuple("Unregister").field(id).finish(),
            HubEvent::Broadcast { origin, payload } => f
                .debug_struct("Broadcast")
                .field("origin", origin)
                .field("len", &payload.len())
                .finish(),
        }
    }
}
