//! Message pusher trait: the connection registry and fan-out seam.
//!
//! The domain layer defines the interface; the WebSocket-backed
//! implementation lives in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::session::ConnectionId;

/// Channel feeding one connection's pusher task. Sending fails exactly when
/// that task has terminated, i.e. the peer socket is dead.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("push to connection '{0}' failed")]
    PushFailed(ConnectionId),
}

/// Registry of live connections plus best-effort fan-out.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Add a connection to the registry. Registering an id twice is a no-op
    /// (the first sender stays in place).
    async fn register(&self, id: ConnectionId, sender: PusherChannel);

    /// Drop a connection from the registry, if present.
    async fn unregister(&self, id: ConnectionId);

    /// Send `content` to a single registered connection.
    async fn push_to(&self, id: ConnectionId, content: &str) -> Result<(), MessagePushError>;

    /// Send `content` to every registered connection. Members whose write
    /// fails are removed after the iteration completes; their ids are
    /// returned so the caller can tear down its own loop when it is among
    /// them.
    async fn broadcast(&self, content: &str) -> Vec<ConnectionId>;

    /// Number of currently registered connections.
    async fn connection_count(&self) -> usize;
}
