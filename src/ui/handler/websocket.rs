//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::domain::ConnectionId;
use crate::ui::state::AppState;

use super::dispatch::{LoopControl, dispatch_message};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if !state.origin_policy.allows(origin) {
        tracing::warn!("rejected upgrade from origin {:?}", origin);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Spawns a task that drains the rx channel into the WebSocket sender.
///
/// Every frame destined for this client - snapshots, cooldown info, and
/// broadcasts initiated by any connection - flows through this channel, so
/// no registry lock is ever held across socket I/O. The task ends when the
/// socket rejects a write or the channel closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ConnectionId::next();
    let (sender, receiver) = socket.split();

    // Channel feeding this connection's pusher task
    let (tx, rx) = mpsc::unbounded_channel();

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let mut recv_task =
        tokio::spawn(async move { recv_loop(receiver, state_clone, conn_id, tx).await });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Whatever ended the connection, it must leave the registry.
    state.pusher.unregister(conn_id).await;
    tracing::info!("connection '{}' closed", conn_id);
}

async fn recv_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    conn_id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("WebSocket error on '{}': {}", conn_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                match dispatch_message(&state, conn_id, &tx, text.as_str()).await {
                    LoopControl::Continue => {}
                    LoopControl::Terminate => break,
                }
            }
            Message::Close(_) => {
                tracing::debug!("connection '{}' requested close", conn_id);
                break;
            }
            Message::Ping(_) => {
                // Ping/pong is handled by the protocol layer
            }
            _ => {}
        }
    }
}
