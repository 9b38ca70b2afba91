//! Request dispatch: envelope decode, authentication gate, method table.
//!
//! Routing is a single table from method name to handler; adding a method
//! means adding one row. Malformed or unauthorized requests are dropped
//! without answering the client - an error frame would hand probers an
//! oracle.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, SessionData};
use crate::infrastructure::dto::websocket::{PixelInfo, WsRequest, WsResponse};
use crate::ui::state::AppState;
use crate::usecase::SetPixelOutcome;

/// Whether the connection's receive loop keeps running after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// The connection failed a write and was dropped from the registry.
    Terminate,
}

/// Everything a method handler gets to work with.
pub struct RequestContext {
    pub state: Arc<AppState>,
    pub conn_id: ConnectionId,
    /// This connection's own pusher channel, for caller-only responses.
    pub sender: mpsc::UnboundedSender<String>,
    pub session: SessionData,
    pub session_token: String,
    pub args: Option<serde_json::Value>,
}

type MethodHandler = fn(RequestContext) -> BoxFuture<'static, LoopControl>;

/// The protocol: one row per method.
const METHOD_TABLE: &[(&str, MethodHandler)] = &[
    ("connectMe", connect_me_handler),
    ("setPixelColor", set_pixel_color_handler),
];

fn lookup_method(method: &str) -> Option<MethodHandler> {
    METHOD_TABLE
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, handler)| *handler)
}

/// Decode one text frame, authenticate it, and run the matching handler.
pub async fn dispatch_message(
    state: &Arc<AppState>,
    conn_id: ConnectionId,
    sender: &mpsc::UnboundedSender<String>,
    text: &str,
) -> LoopControl {
    let request: WsRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("cannot decode request on '{}': {}", conn_id, e);
            return LoopControl::Continue;
        }
    };

    // Check that the user is logged in (session exists and has a login)
    let session = match state.repository.get_session(&request.session_token).await {
        Ok(Some(session)) if session.is_logged_in() => session,
        Ok(_) => {
            // Cheating? Ignore request.
            tracing::debug!("unauthenticated request on '{}' ignored", conn_id);
            return LoopControl::Continue;
        }
        Err(e) => {
            tracing::error!("session lookup failed: {}", e);
            return LoopControl::Continue;
        }
    };

    let Some(handler) = lookup_method(&request.method) else {
        tracing::warn!("unsupported method '{}'", request.method);
        return LoopControl::Continue;
    };

    handler(RequestContext {
        state: state.clone(),
        conn_id,
        sender: sender.clone(),
        session,
        session_token: request.session_token,
        args: request.args,
    })
    .await
}

fn connect_me_handler(ctx: RequestContext) -> BoxFuture<'static, LoopControl> {
    Box::pin(handle_connect_me(ctx))
}

fn set_pixel_color_handler(ctx: RequestContext) -> BoxFuture<'static, LoopControl> {
    Box::pin(handle_set_pixel_color(ctx))
}

/// `connectMe`: register, send the stripe snapshot, then the remaining
/// cooldown when one is running.
async fn handle_connect_me(ctx: RequestContext) -> LoopControl {
    tracing::info!(login = %ctx.session.login, "connectMe()");

    let snapshot = ctx
        .state
        .connect_client_usecase
        .execute(ctx.conn_id, ctx.sender.clone())
        .await;

    let response = WsResponse::AllPixelsColors(snapshot.into());
    let json = serde_json::to_string(&response).unwrap();
    if ctx.sender.send(json).is_err() {
        ctx.state.pusher.unregister(ctx.conn_id).await;
        return LoopControl::Terminate;
    }

    // Also send cooldown info (if present)
    match ctx
        .state
        .connect_client_usecase
        .remaining_cooldown(&ctx.session_token)
        .await
    {
        Ok(seconds) if seconds > 0 => {
            let json = serde_json::to_string(&WsResponse::CooldownInfo(seconds)).unwrap();
            if ctx.sender.send(json).is_err() {
                ctx.state.pusher.unregister(ctx.conn_id).await;
                return LoopControl::Terminate;
            }
        }
        Ok(_) => {}
        Err(e) => {
            // Transient store failure: the client just misses the hint.
            tracing::error!("cannot read cooldown: {}", e);
        }
    }

    LoopControl::Continue
}

/// `setPixelColor`: cooldown, write, fan-out.
async fn handle_set_pixel_color(ctx: RequestContext) -> LoopControl {
    let Some(args) = ctx.args else {
        tracing::warn!("setPixelColor without args on '{}'", ctx.conn_id);
        return LoopControl::Continue;
    };
    let pixel: PixelInfo = match serde_json::from_value(args) {
        Ok(pixel) => pixel,
        Err(e) => {
            // Problems with user data. Just ignore.
            tracing::warn!("cannot decode setPixelColor args: {}", e);
            return LoopControl::Continue;
        }
    };

    let payload = serde_json::to_string(&WsResponse::PixelColor(pixel)).unwrap();

    let outcome = ctx
        .state
        .set_pixel_usecase
        .execute(&ctx.session_token, pixel.x, pixel.y, pixel.color, payload)
        .await;

    match outcome {
        Ok(SetPixelOutcome::Placed { evicted }) => {
            tracing::info!(
                "setPixelColor(x={}, y={}, color(code)={})",
                pixel.x,
                pixel.y,
                pixel.color.0
            );
            if evicted.contains(&ctx.conn_id) {
                return LoopControl::Terminate;
            }
        }
        Ok(SetPixelOutcome::OnCooldown) => {
            // Cooldown has not expired yet. Maybe cheating. Ignore request.
            tracing::debug!("setPixelColor during cooldown ignored");
        }
        Ok(SetPixelOutcome::NotMine) => {
            // Managed by another worker, or out of bounds. Ignore request.
            tracing::debug!("setPixelColor outside owned cells ignored");
        }
        Ok(SetPixelOutcome::UnknownColor) => {
            tracing::debug!("setPixelColor with unknown color ignored");
        }
        Err(e) => {
            tracing::error!("cooldown update failed: {}", e);
        }
    }

    LoopControl::Continue
}
