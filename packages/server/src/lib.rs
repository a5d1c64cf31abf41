//! Broadcast hub served over WebSocket.
//!
//! Every text message received from any connection is relayed to every
//! registered connection. The crate is layered:
//!
//! - [`domain`]: identities, the [`domain::Connection`] seam and the
//!   [`domain::ConnectionRegistry`] contract.
//! - [`infrastructure`]: the in-memory registry, the axum WebSocket adapter
//!   and HTTP DTOs.
//! - [`usecase`]: the [`usecase::BroadcastCoordinator`], the single consumer
//!   of hub events, and the per-event use cases it runs.
//! - [`ui`]: routes, read pumps and process signals.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod test_support;

pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{run as run_server, serve};
pub use usecase::HubConfig;
