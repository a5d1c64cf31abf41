//! Infrastructure layer: registry storage, transport adapter and DTOs.

pub mod dto;
pub mod repository;
pub mod transport;
