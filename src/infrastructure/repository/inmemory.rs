//! In-memory session repository.
//!
//! Implements the same observable contract as the Redis repository over
//! plain hash maps, so use cases and the WebSocket stack can be exercised
//! without a live store. Tests seed it with sessions directly.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{RepositoryError, SessionData, SessionRepository};

pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, SessionData>>,
    /// Session id -> unix second at which the cooldown expires.
    cooldowns: Mutex<HashMap<String, i64>>,
    clock: Arc<dyn Clock>,
    cooldown_seconds: u64,
}

impl InMemorySessionRepository {
    pub fn new(clock: Arc<dyn Clock>, cooldown_seconds: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            cooldowns: Mutex::new(HashMap::new()),
            clock,
            cooldown_seconds,
        }
    }

    /// Store a session record, keyed by its id.
    pub async fn insert_session(&self, session: SessionData) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id.clone(), session);
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionData>, RepositoryError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn test_and_update_cooldown(
        &self,
        session_id: &str,
    ) -> Result<bool, RepositoryError> {
        let now = self.clock.now_unix();
        let fresh_expiry = now + self.cooldown_seconds as i64;

        let mut cooldowns = self.cooldowns.lock().await;
        let prev = cooldowns.insert(session_id.to_string(), fresh_expiry);

        if let Some(prev_expiry) = prev {
            if prev_expiry > now {
                // Still within the old window: put it back unchanged.
                cooldowns.insert(session_id.to_string(), prev_expiry);
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn remaining_cooldown(&self, session_id: &str) -> Result<u64, RepositoryError> {
        let cooldowns = self.cooldowns.lock().await;
        let Some(expiry) = cooldowns.get(session_id) else {
            return Ok(0);
        };

        let remaining = expiry - self.clock.now_unix();
        Ok(remaining.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;

    fn logged_in_session(id: &str, login: &str) -> SessionData {
        SessionData {
            login: login.to_string(),
            id: id.to_string(),
            validation_errors: HashMap::new(),
        }
    }

    fn repository_at(now: i64, cooldown_seconds: u64) -> InMemorySessionRepository {
        InMemorySessionRepository::new(Arc::new(FixedClock::new(now)), cooldown_seconds)
    }

    #[tokio::test]
    async fn test_get_session_returns_none_for_unknown_id() {
        // given:
        let repository = repository_at(1_000, 5);

        // when:
        let session = repository.get_session("missing").await.unwrap();

        // then:
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_get_session_returns_seeded_record() {
        // given:
        let repository = repository_at(1_000, 5);
        repository
            .insert_session(logged_in_session("sX", "alice"))
            .await;

        // when:
        let session = repository.get_session("sX").await.unwrap().unwrap();

        // then:
        assert_eq!(session.login, "alice");
    }

    #[tokio::test]
    async fn test_first_cooldown_check_passes_and_installs_window() {
        // given:
        let repository = repository_at(1_000, 5);

        // when:
        let was_on_cooldown = repository.test_and_update_cooldown("sX").await.unwrap();

        // then: no previous window, and a fresh one now stands
        assert!(!was_on_cooldown);
        assert_eq!(repository.remaining_cooldown("sX").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_second_check_within_window_is_on_cooldown() {
        // given:
        let repository = repository_at(1_000, 5);
        repository.test_and_update_cooldown("sX").await.unwrap();

        // when:
        let was_on_cooldown = repository.test_and_update_cooldown("sX").await.unwrap();

        // then:
        assert!(was_on_cooldown);
    }

    #[tokio::test]
    async fn test_live_window_is_never_shortened() {
        // given: a window installed at t=1000 with 5 seconds
        let clock = Arc::new(FixedClock::new(1_000));
        let repository = InMemorySessionRepository::new(clock, 5);
        repository.test_and_update_cooldown("sX").await.unwrap();

        // when: a second check fails while the window is live
        repository.test_and_update_cooldown("sX").await.unwrap();

        // then: the original expiry still stands
        assert_eq!(repository.remaining_cooldown("sX").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_expired_window_passes_again() {
        // given: a window that expired in the past
        let repository = repository_at(1_000, 5);
        {
            let mut cooldowns = repository.cooldowns.lock().await;
            cooldowns.insert("sX".to_string(), 999);
        }

        // when:
        let was_on_cooldown = repository.test_and_update_cooldown("sX").await.unwrap();

        // then:
        assert!(!was_on_cooldown);
    }

    #[tokio::test]
    async fn test_remaining_cooldown_is_zero_when_absent_or_expired() {
        // given:
        let repository = repository_at(1_000, 5);

        // then: absent
        assert_eq!(repository.remaining_cooldown("sX").await.unwrap(), 0);

        // given: expired
        {
            let mut cooldowns = repository.cooldowns.lock().await;
            cooldowns.insert("sX".to_string(), 900);
        }

        // then:
        assert_eq!(repository.remaining_cooldown("sX").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cooldown_records_are_per_session() {
        // given:
        let repository = repository_at(1_000, 5);

        // when:
        repository.test_and_update_cooldown("sX").await.unwrap();

        // then: another session is unaffected
        assert!(!repository.test_and_update_cooldown("sY").await.unwrap());
    }
}
