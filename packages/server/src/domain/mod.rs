//! Domain layer: identities, the transport seam and the registry contract.

pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod registry;
pub mod value_object;

pub use connection::Connection;
pub use entity::{HubSnapshot, Member, MemberSummary};
pub use error::{HubError, TransportError, ValueObjectError};
pub use event::HubEvent;
pub use factory::ConnectionIdFactory;
pub use registry::ConnectionRegistry;
pub use value_object::{ConnectionId, Payload, Timestamp};

#[cfg(test)]
pub use connection::MockConnection;
