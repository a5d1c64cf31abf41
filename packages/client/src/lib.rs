//! Terminal client for the Fanout hub.
//!
//! Sends every console line to the hub as a text message and prints every
//! message the hub relays back. Ctrl+C closes the connection gracefully.

pub mod config;
pub mod console;
pub mod error;
pub mod runner;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run as run_client;
pub use session::{SessionEnd, run_session};
