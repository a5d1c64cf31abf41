//! Connection doubles shared by unit tests.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::domain::{Connection, ConnectionId, Payload, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBehavior {
    Accept,
    Fail,
    Stall,
    /// Both writes and close never complete
    Frozen,
}

/// Records every payload written to it.
pub struct RecordingConnection {
    id: ConnectionId,
    behavior: WriteBehavior,
    received: Mutex<Vec<String>>,
    send_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

impl RecordingConnection {
    pub fn new(id: &str) -> Arc<Self> {
        Self::with_behavior(id, WriteBehavior::Accept)
    }

    pub fn failing(id: &str) -> Arc<Self> {
        Self::with_behavior(id, WriteBehavior::Fail)
    }

    pub fn stalling(id: &str) -> Arc<Self> {
        Self::with_behavior(id, WriteBehavior::Stall)
    }

    pub fn frozen(id: &str) -> Arc<Self> {
        Self::with_behavior(id, WriteBehavior::Frozen)
    }

    fn with_behavior(id: &str, behavior: WriteBehavior) -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::new(id.to_string()).unwrap(),
            behavior,
            received: Mutex::new(Vec::new()),
            send_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
        })
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn cid(&self) -> ConnectionId {
        self.id.clone()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    async fn send(&self, payload: &Payload) -> Result<(), TransportError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            WriteBehavior::Accept => {
                self.received
                    .lock()
                    .unwrap()
                    .push(payload.as_str().to_string());
                Ok(())
            }
            WriteBehavior::Fail => Err(TransportError::Send("broken pipe".to_string())),
            WriteBehavior::Stall | WriteBehavior::Frozen => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.behavior == WriteBehavior::Frozen {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
}
