//! Domain model: canvas matrix, palette, sessions, and the abstraction
//! seams (repository, message pusher) the use cases depend on.

pub mod color;
pub mod matrix;
pub mod message_pusher;
pub mod repository;
pub mod session;

pub use color::{ColorCode, Palette, PaletteError, Rgba};
pub use matrix::{CanvasMatrix, CanvasSnapshot};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::{RepositoryError, SessionRepository};
pub use session::{ConnectionId, SessionData};
