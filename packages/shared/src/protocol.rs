//! Constants both ends of the hub agree on.

/// Port used by `start` and `connect` when none is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Host used by `connect` when none is given.
pub const DEFAULT_HOST: &str = "localhost";

/// Path of the WebSocket upgrade endpoint.
pub const WS_PATH: &str = "/ws";

/// Build the WebSocket URL of a hub.
pub fn hub_url(host: &str, port: u16) -> String {
    format!("ws://{host}:{port}{WS_PATH}")
}
