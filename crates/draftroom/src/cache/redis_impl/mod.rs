//! Redis cache backend, for several processes sharing one draft store.

mod cache;
mod error;

pub use cache::{RedisCache, DEFAULT_KEY_PREFIX};
