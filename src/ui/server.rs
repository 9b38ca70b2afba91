//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::domain::{MessagePusher, SessionRepository};
use crate::usecase::{ConnectClientUseCase, SetPixelUseCase};

use super::{
    handler::websocket_handler, origin::OriginPolicy, signal::shutdown_signal, state::AppState,
};

/// Canvas worker server: a single route performing the WebSocket upgrade.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        set_pixel_usecase: Arc<SetPixelUseCase>,
        repository: Arc<dyn SessionRepository>,
        pusher: Arc<dyn MessagePusher>,
        origin_policy: OriginPolicy,
    ) -> Self {
        let state = Arc::new(AppState {
            connect_client_usecase,
            set_pixel_usecase,
            repository,
            pusher,
            origin_policy,
        });
        Self { state }
    }

    /// Build the router. Exposed so tests can serve it on an ephemeral
    /// listener.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(websocket_handler))
            .with_state(self.state.clone())
    }

    /// Bind `listen_addr` and serve until Ctrl+C / SIGTERM.
    pub async fn run(self, listen_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(listen_addr).await?;

        tracing::info!("canvas worker listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/", listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Worker shutdown complete");

        Ok(())
    }
}
