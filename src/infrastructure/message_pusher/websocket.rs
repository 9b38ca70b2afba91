//! WebSocket-backed message pusher.
//!
//! Owns the registry of live connections. The WebSocket itself is created
//! in the UI layer, which hands the per-connection `UnboundedSender` over
//! at registration; this type only manages membership and message
//! delivery. A send fails exactly when the connection's pusher task has
//! terminated, which is how dead peers are detected during broadcast.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

pub struct WebSocketMessagePusher {
    /// Registered connections. The lock is held only across map and
    /// channel operations; socket I/O happens in the pusher tasks.
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.entry(id).or_insert(sender);
        tracing::debug!("connection '{}' registered", id);
    }

    async fn unregister(&self, id: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(&id);
        tracing::debug!("connection '{}' unregistered", id);
    }

    async fn push_to(&self, id: ConnectionId, content: &str) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        let sender = connections
            .get(&id)
            .ok_or(MessagePushError::ConnectionNotFound(id))?;
        sender
            .send(content.to_string())
            .map_err(|_| MessagePushError::PushFailed(id))
    }

    async fn broadcast(&self, content: &str) -> Vec<ConnectionId> {
        let mut connections = self.connections.lock().await;

        // Collect failures first; members are pruned only after the whole
        // registry has been walked.
        let mut failed = Vec::new();
        for (id, sender) in connections.iter() {
            if sender.send(content.to_string()).is_err() {
                tracing::warn!("broadcast to connection '{}' failed", id);
                failed.push(*id);
            }
        }

        for id in &failed {
            connections.remove(id);
        }

        failed
    }

    async fn connection_count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
