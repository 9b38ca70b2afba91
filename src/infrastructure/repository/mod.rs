//! Session repository implementations.
//!
//! `redis` is the production store; `inmemory` implements the same
//! contract for tests.

pub mod inmemory;
pub mod redis;

pub use inmemory::InMemorySessionRepository;
pub use redis::RedisSessionRepository;
