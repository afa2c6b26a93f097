//! Process-local draft cache.
//!
//! Bounded by entry count with least-recently-used eviction. Entries may
//! carry a TTL, checked lazily on read.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use draftroom_core::cache::{Cache, Result};

#[derive(Debug, Clone)]
struct Slot {
    bytes: Vec<u8>,
    deadline: Option<Instant>,
}

impl Slot {
    fn live_at(&self, now: Instant) -> bool {
        self.deadline.is_none_or(|deadline| now <= deadline)
    }
}

/// LRU [`Cache`] living inside the process.
///
/// Clones share the same storage. Only suitable when a single process owns
/// the draft store; use the Redis backend otherwise.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    slots: Arc<RwLock<LruCache<String, Slot>>>,
}

impl MemoryCache {
    /// Holds at most `max_entries` drafts. A capacity of 0 is raised to 1.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Entries currently held, including expired ones not yet read.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // A hit bumps recency, so reads need the write lock too.
        let mut slots = self.slots.write().await;
        let now = Instant::now();

        match slots.get(key) {
            Some(slot) if slot.live_at(now) => Ok(Some(slot.bytes.clone())),
            Some(_) => {
                slots.pop(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let slot = Slot {
            bytes: value.to_vec(),
            deadline: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.slots.write().await.put(key.to_owned(), slot);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.slots.write().await.pop(key);
        Ok(())
    }
}
