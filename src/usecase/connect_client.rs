//! UseCase: a viewer connects (the `connectMe` method).
//!
//! Registers the connection for future broadcasts and hands the caller the
//! data it must push back: the stripe snapshot and, separately, the
//! remaining cooldown. Serialization and the actual writes stay in the UI
//! layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    CanvasMatrix, CanvasSnapshot, ConnectionId, MessagePusher, PusherChannel, RepositoryError,
    SessionRepository,
};

pub struct ConnectClientUseCase {
    matrix: Arc<Mutex<CanvasMatrix>>,
    repository: Arc<dyn SessionRepository>,
    pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(
        matrix: Arc<Mutex<CanvasMatrix>>,
        repository: Arc<dyn SessionRepository>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            matrix,
            repository,
            pusher,
        }
    }

    /// Register the connection (idempotent) and return the snapshot of the
    /// owned stripe.
    pub async fn execute(&self, conn_id: ConnectionId, sender: PusherChannel) -> CanvasSnapshot {
        self.pusher.register(conn_id, sender).await;

        let matrix = self.matrix.lock().await;
        matrix.snapshot()
    }

    /// Seconds left on the session's cooldown window, zero when none.
    pub async fn remaining_cooldown(&self, session_id: &str) -> Result<u64, RepositoryError> {
        self.repository.remaining_cooldown(session_id).await
    }
}
