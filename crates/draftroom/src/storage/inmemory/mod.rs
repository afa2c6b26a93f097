//! In-memory storage backend.
//!
//! Stores drafts in a map behind `Arc<RwLock<_>>`, with the same constraints
//! the SQLite schema enforces (case-insensitive unique names, cascading
//! depth-chart deletes). Used by tests and builds without the `sqlite` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use draftroom::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
