//! WebSocket wire protocol DTOs (JSON text frames).
//!
//! Client requests are an envelope of `method` / `args` / `sessionToken`;
//! server messages are an envelope of `kind` / `data`.

use serde::{Deserialize, Serialize};

use crate::domain::{CanvasSnapshot, ColorCode};

/// Client request envelope.
///
/// `args` is method-specific and left undecoded here; `sessionToken`
/// defaults to the empty string so that requests without one fall through
/// the session lookup and get ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsRequest {
    pub method: String,
    #[serde(default)]
    pub args: Option<serde_json::Value>,
    #[serde(default)]
    pub session_token: String,
}

/// Pixel coordinates and color, both as submitted by a client and as
/// broadcast to all viewers.
///
/// Coordinates are signed on the wire: hostile clients may send negative
/// numbers, which the use case rejects before they reach the matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PixelInfo {
    pub x: i64,
    pub y: i64,
    pub color: ColorCode,
}

/// Payload of `allPixelsColors`: the stripe snapshot plus the layout pair
/// `(offset, eachNth)` clients use to place it on the full canvas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllPixelsColorsData {
    pub color_codes: Vec<ColorCode>,
    pub offset: usize,
    pub each_nth: usize,
}

impl From<CanvasSnapshot> for AllPixelsColorsData {
    fn from(snapshot: CanvasSnapshot) -> Self {
        Self {
            color_codes: snapshot.color_codes,
            offset: snapshot.offset,
            each_nth: snapshot.each_nth,
        }
    }
}

/// Server message envelope, serialized as `{"kind": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum WsResponse {
    #[serde(rename = "pixelColor")]
    PixelColor(PixelInfo),
    #[serde(rename = "allPixelsColors")]
    AllPixelsColors(AllPixelsColorsData),
    /// Seconds remaining on the caller's cooldown (only sent when > 0).
    #[serde(rename = "cooldownInfo")]
    CooldownInfo(u64),
}
