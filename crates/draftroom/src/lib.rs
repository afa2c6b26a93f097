//! Draft lifecycle service: storage backends, caches, and the access facade.
//!
//! The pure domain lives in `draftroom_core`; this crate wires it to SQLite
//! (or memory) and to an in-memory or Redis cache, and exposes the command
//! line in [`cli`].

pub mod access;
pub mod cache;
pub mod cli;
pub mod config;
pub mod storage;

pub use access::{AccessError, DraftAccess};
pub use config::Config;
