//! Realtime collaborative pixel canvas worker.
//!
//! Each worker instance owns a vertical stripe of the shared canvas and
//! serves it over WebSocket: clients receive the stripe snapshot on
//! connect and live pixel updates as other clients place pixels, subject
//! to a per-session cooldown kept in Redis.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
