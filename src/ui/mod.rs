//! WebSocket worker front: axum server, upgrade handler, dispatch.

pub mod handler;
pub mod origin;
pub mod server;
mod signal;
pub mod state;

pub use origin::OriginPolicy;
pub use server::Server;
