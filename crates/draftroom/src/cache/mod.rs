//! Cache backend implementations.
//!
//! Concrete implementations of [`draftroom_core::cache::Cache`].
//!
//! # Feature Flags
//!
//! - the in-memory LRU cache is always compiled
//! - `redis`: Redis cache using the redis crate, for multi-instance deployments

mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
