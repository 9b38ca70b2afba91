//! Session record and connection identity.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Session record written by the front-end service.
///
/// The front-end serializes its fields with PascalCase names, so the worker
/// decodes that exact shape. An empty `login` means "not logged in" and the
/// request carrying it is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionData {
    pub login: String,
    pub id: String,
    #[serde(default)]
    pub validation_errors: HashMap<String, String>,
}

impl SessionData {
    /// Whether this session belongs to a logged-in user.
    pub fn is_logged_in(&self) -> bool {
        !self.login.is_empty()
    }
}

/// Identity of one WebSocket connection, used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

impl ConnectionId {
    /// Allocate a fresh process-wide unique id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
