//! Shared application state.

use std::sync::Arc;

use crate::domain::{MessagePusher, SessionRepository};
use crate::usecase::{ConnectClientUseCase, SetPixelUseCase};

use super::origin::OriginPolicy;

/// Everything a connection task needs, threaded explicitly through the
/// handlers instead of living in module-level globals.
pub struct AppState {
    /// UseCase behind `connectMe`
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// UseCase behind `setPixelColor`
    pub set_pixel_usecase: Arc<SetPixelUseCase>,
    /// Session lookups for the per-request authentication gate
    pub repository: Arc<dyn SessionRepository>,
    /// Registry handle for connection-teardown cleanup
    pub pusher: Arc<dyn MessagePusher>,
    /// Origin header policy applied before the upgrade
    pub origin_policy: OriginPolicy,
}
