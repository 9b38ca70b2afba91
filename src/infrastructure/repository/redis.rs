//! Redis-backed session repository.
//!
//! Sessions live under `Session:<id>` (written by the front-end service),
//! cooldowns under `Cooldown:<id>` (written here). Redis has no native
//! test-and-set with TTL, so the cooldown update emulates one:
//!
//! ```text
//! prev = GETSET Cooldown:<id> (now + CooldownSeconds)
//! if prev parses to p and p > now:
//!     SET Cooldown:<id> p EX CooldownSeconds     # never shorten a live window
//!     -> on cooldown
//! EXPIRE Cooldown:<id> CooldownSeconds
//! -> not on cooldown
//! ```
//!
//! Two concurrent callers on the same session may both observe "no
//! cooldown" because GETSET serializes them arbitrarily; the window is
//! never shortened and the key always carries a TTL.

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::common::config::AppConfig;
use crate::common::time::Clock;
use crate::domain::{RepositoryError, SessionData, SessionRepository};

fn session_key(session_id: &str) -> String {
    format!("Session:{session_id}")
}

fn cooldown_key(session_id: &str) -> String {
    format!("Cooldown:{session_id}")
}

fn store_err(err: redis::RedisError) -> RepositoryError {
    RepositoryError::Store(err.to_string())
}

/// Session repository over a shared Redis instance.
///
/// `ConnectionManager` multiplexes and reconnects internally; it is cloned
/// per call, which is cheap by design.
pub struct RedisSessionRepository {
    manager: ConnectionManager,
    clock: Arc<dyn Clock>,
    cooldown_seconds: u64,
}

impl RedisSessionRepository {
    pub fn new(manager: ConnectionManager, clock: Arc<dyn Clock>, cooldown_seconds: u64) -> Self {
        Self {
            manager,
            clock,
            cooldown_seconds,
        }
    }

    /// Connect to the Redis instance named by the configuration and verify
    /// the connection with a PING.
    pub async fn connect(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RepositoryError> {
        let (host, port) = config
            .redis_address
            .rsplit_once(':')
            .ok_or_else(|| {
                RepositoryError::Store(format!(
                    "RedisAddress '{}' is not host:port",
                    config.redis_address
                ))
            })?;
        let port: u16 = port.parse().map_err(|_| {
            RepositoryError::Store(format!("invalid Redis port in '{}'", config.redis_address))
        })?;

        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(host.to_string(), port),
            redis: RedisConnectionInfo {
                db: config.redis_database,
                password: (!config.redis_password.is_empty())
                    .then(|| config.redis_password.clone()),
                ..Default::default()
            },
        };

        let client = redis::Client::open(info).map_err(store_err)?;
        let mut manager = ConnectionManager::new(client).await.map_err(store_err)?;

        let _: String = redis::cmd("PING")
            .query_async(&mut manager)
            .await
            .map_err(store_err)?;

        Ok(Self::new(manager, clock, config.cooldown_seconds))
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionData>, RepositoryError> {
        let mut conn = self.manager.clone();

        let raw: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(store_err)?;

        match raw {
            None => Ok(None),
            Some(raw) => {
                let session: SessionData = serde_json::from_str(&raw)
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                Ok(Some(session))
            }
        }
    }

    async fn test_and_update_cooldown(
        &self,
        session_id: &str,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.manager.clone();
        let key = cooldown_key(session_id);

        let now = self.clock.now_unix();
        let fresh_expiry = now + self.cooldown_seconds as i64;

        let prev: Option<String> = conn
            .getset(&key, fresh_expiry)
            .await
            .map_err(store_err)?;

        if let Some(prev) = prev {
            // An unparsable record counts as expired and gets overwritten.
            if let Ok(prev_expiry) = prev.parse::<i64>() {
                if prev_expiry > now {
                    // Still within the old window: put it back unchanged.
                    let _: () = conn
                        .set_ex(&key, prev_expiry, self.cooldown_seconds)
                        .await
                        .map_err(store_err)?;
                    return Ok(true);
                }
            }
        }

        // TTL bounds storage for abandoned sessions.
        let _: () = conn
            .expire(&key, self.cooldown_seconds as i64)
            .await
            .map_err(store_err)?;

        Ok(false)
    }

    async fn remaining_cooldown(&self, session_id: &str) -> Result<u64, RepositoryError> {
        let mut conn = self.manager.clone();

        let raw: Option<String> = conn
            .get(cooldown_key(session_id))
            .await
            .map_err(store_err)?;

        let Some(raw) = raw else {
            return Ok(0);
        };
        let Ok(expiry) = raw.parse::<i64>() else {
            return Ok(0);
        };

        let remaining = expiry - self.clock.now_unix();
        Ok(remaining.max(0) as u64)
    }
}
