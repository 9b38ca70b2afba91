//! UseCase: a pixel placement (the `setPixelColor` method).
//!
//! Decision ladder: cooldown test-and-set first, then the bounds and
//! ownership checks, then the matrix write, then the fan-out. The cooldown
//! is consumed before the ownership check, so a request routed to the
//! wrong worker still spends its window. Every rejection is silent towards
//! the client.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    CanvasMatrix, ColorCode, ConnectionId, MessagePusher, Palette, RepositoryError,
    SessionRepository,
};

/// What happened to a placement request. Only `Placed` produces a
/// broadcast; all other outcomes are ignored without answering the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetPixelOutcome {
    /// Written and broadcast; connections evicted during the fan-out are
    /// attached so the caller can tear down its own loop if it is listed.
    Placed { evicted: Vec<ConnectionId> },
    /// The session is still within its cooldown window.
    OnCooldown,
    /// Out of canvas bounds or a column owned by another worker.
    NotMine,
    /// Color code outside the configured palette.
    UnknownColor,
}

pub struct SetPixelUseCase {
    matrix: Arc<Mutex<CanvasMatrix>>,
    palette: Arc<Palette>,
    repository: Arc<dyn SessionRepository>,
    pusher: Arc<dyn MessagePusher>,
}

impl SetPixelUseCase {
    pub fn new(
        matrix: Arc<Mutex<CanvasMatrix>>,
        palette: Arc<Palette>,
        repository: Arc<dyn SessionRepository>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            matrix,
            palette,
            repository,
            pusher,
        }
    }

    /// Attempt a placement. `payload` is the pre-serialized `pixelColor`
    /// frame broadcast to every registered connection on success.
    ///
    /// An `Err` means the cooldown store failed; the caller logs it and
    /// keeps the connection.
    pub async fn execute(
        &self,
        session_id: &str,
        x: i64,
        y: i64,
        color: ColorCode,
        payload: String,
    ) -> Result<SetPixelOutcome, RepositoryError> {
        if self.repository.test_and_update_cooldown(session_id).await? {
            return Ok(SetPixelOutcome::OnCooldown);
        }

        // Hostile clients can send any numbers they like.
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return Ok(SetPixelOutcome::NotMine);
        };
        if !self.palette.contains(color) {
            return Ok(SetPixelOutcome::UnknownColor);
        }

        // The guard stays alive across the fan-out so that broadcast order
        // matches matrix write order. Both are memory-only operations; the
        // socket writes happen in the per-connection pusher tasks.
        let mut matrix = self.matrix.lock().await;
        if !matrix.set(x, y, color) {
            return Ok(SetPixelOutcome::NotMine);
        }

        let evicted = self.pusher.broadcast(&payload).await;
        Ok(SetPixelOutcome::Placed { evicted })
    }
}
