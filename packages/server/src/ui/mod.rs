//! Axum transport glue: routes, WebSocket read pumps and signal handling.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{router, run, serve};
pub use signal::shutdown_signal;
