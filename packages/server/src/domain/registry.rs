//! Connection registry abstraction.

use std::sync::Arc;

use super::{ConnectionId, Member, Timestamp, connection::Connection};

/// The set of currently live connections, keyed by identity.
///
/// Iteration order is unspecified. Implementations never block on transport
/// I/O; every method is a plain in-memory operation. The registry is owned by
/// the broadcast coordinator and is not shared between execution contexts.
pub trait ConnectionRegistry: Send {
    /// Insert a connection. Re-adding a present identity keeps the original
    /// registration time.
    fn add(&mut self, connection: Arc<dyn Connection>, registered_at: Timestamp);

    /// Remove a connection, returning it if it was present.
    fn remove(&mut self, id: &ConnectionId) -> Option<Member>;

    /// Call `f` once per member over a snapshot taken before the first call.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Member);

    fn contains(&self, id: &ConnectionId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect the current members.
    fn snapshot(&self) -> Vec<Member> {
        let mut members = Vec::with_capacity(self.len());
        self.for_each(|member| members.push(member.clone()));
        members
    }
}
