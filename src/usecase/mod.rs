//! Use cases: one per WebSocket protocol method.

pub mod connect_client;
pub mod set_pixel;

pub use connect_client::ConnectClientUseCase;
pub use set_pixel::{SetPixelOutcome, SetPixelUseCase};
