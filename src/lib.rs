//! Fanout: a real-time WebSocket fan-out hub.
//!
//! `fanout start` runs the hub, `fanout connect` attaches a terminal to one.

pub mod cli;

pub use fanout_client::{ClientConfig, ClientError, run_client};
pub use fanout_server::{HubConfig, ServerConfig, ServerError, run_server};
