//! Core domain models for the broadcast hub.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{ConnectionId, Timestamp, connection::Connection};

/// A connection currently registered with the hub.
#[derive(Clone)]
pub struct Member {
    /// Shared handle used for fan-out writes
    pub connection: Arc<dyn Connection>,
    /// Timestamp when the connection was registered
    pub registered_at: Timestamp,
}

impl Member {
    pub fn new(connection: Arc<dyn Connection>, registered_at: Timestamp) -> Self {
        Self {
            connection,
            registered_at,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        self.connection.id()
    }

    pub fn summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id().clone(),
            registered_at: self.registered_at,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", self.id())
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// Diagnostic view of a single member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: ConnectionId,
    pub registered_at: Timestamp,
}

/// Diagnostic view of the hub membership, published after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubSnapshot {
    pub connection_count: usize,
    /// Sorted by registration time, then id
    pub members: Vec<MemberSummary>,
}

impl HubSnapshot {
    pub fn from_members(mut members: Vec<MemberSummary>) -> Self {
        members.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Self {
            connection_count: members.len(),
            members,
        }
    }
}
