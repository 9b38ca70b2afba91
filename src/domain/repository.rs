//! Repository trait for session and cooldown records.
//!
//! The domain layer defines the interface it needs against the shared
//! key-value store; the concrete implementations (Redis, in-memory) live in
//! the infrastructure layer (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;

use super::session::SessionData;

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store is unreachable or a command failed.
    #[error("store error: {0}")]
    Store(String),

    /// A stored record exists but cannot be decoded.
    #[error("cannot decode stored record: {0}")]
    Decode(String),
}

/// Access to session records and per-session cooldowns.
///
/// Sessions are written by the front-end service; the worker only reads
/// them. Cooldown records are owned by the worker.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Look up a session record. Absent key is `Ok(None)`, not an error.
    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionData>, RepositoryError>;

    /// Test whether the session is on cooldown, installing a fresh cooldown
    /// window if and only if none was active.
    ///
    /// Returns `true` when an unexpired cooldown was already in place (the
    /// caller must drop the request) and `false` when the new window now
    /// stands. A live window is never shortened. Concurrent callers on the
    /// same session may both see `false`; see the Redis implementation for
    /// why that is accepted.
    async fn test_and_update_cooldown(
        &self,
        session_id: &str,
    ) -> Result<bool, RepositoryError>;

    /// Seconds until the session may place a pixel again. Absent or
    /// unparsable records count as no cooldown.
    async fn remaining_cooldown(&self, session_id: &str) -> Result<u64, RepositoryError>;
}
