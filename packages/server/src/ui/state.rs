//! Server state shared by the HTTP and WebSocket handlers.

use crate::usecase::HubHandle;

/// Shared application state
pub struct AppState {
    /// Producer side of the hub event stream
    pub hub: HubHandle,
    /// Unix timestamp (milliseconds, UTC) when the server started
    pub started_at: i64,
}
