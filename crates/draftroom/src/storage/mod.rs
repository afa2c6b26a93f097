//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `draftroom_core::storage`, plus the caching decorator that sits
//! in front of them.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - the in-memory backend is always compiled
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p draftroom
//! ```
//!
//! Build with only the in-memory store:
//! ```bash
//! cargo build -p draftroom --no-default-features
//! ```

pub mod cached;
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::CachedDraftRepository;
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
