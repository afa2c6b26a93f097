//! Cached repository decorator.
//!
//! Wraps a [`DraftRepository`](draftroom_core::storage::DraftRepository) with
//! the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then invalidate the cached draft
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(SqliteRepository::new("draftroom.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedDraftRepository::new(repo, cache, None);
//! ```

mod draft;

pub use draft::CachedDraftRepository;
