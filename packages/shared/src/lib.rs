//! Utilities shared by the Fanout hub and its terminal client.

pub mod logger;
pub mod protocol;
pub mod time;
