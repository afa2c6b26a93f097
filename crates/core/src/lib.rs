//! Pure types and ports for the draft lifecycle.
//!
//! Nothing here performs I/O. Storage and cache backends implement the
//! traits in [`storage`] and [`cache`] in the `draftroom` crate.

pub mod cache;
pub mod draft;
pub mod identity;
pub mod reference;
pub mod storage;
