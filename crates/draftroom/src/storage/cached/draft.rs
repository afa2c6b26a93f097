//! Cached draft repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use draftroom_core::cache::{deserialize_draft, draft_key, serialize_draft, Cache};
use draftroom_core::draft::{Draft, DraftId, DraftSettings, DraftStatus, NextPick};
use draftroom_core::storage::{DraftFilter, DraftRepository, RepositoryError, Result};

/// Cached draft repository decorator.
///
/// Implements the cache-aside pattern:
/// - **Reads**: Check cache first, on miss fetch from repository and populate cache
/// - **Writes**: Persist to repository, then delete `draft:{id}`
///
/// Cache failures never fail an operation: a broken cache reads as a miss
/// and a failed invalidation is logged. Listings are never cached.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedDraftRepository<R, C>
where
    R: DraftRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Option<Duration>,
}

impl<R, C> CachedDraftRepository<R, C>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    /// Creates a new cached draft repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached drafts; `None` keeps them until invalidated
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Option<Duration>) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    /// Loads a draft, optionally bypassing the cache.
    ///
    /// With `bust_cache` the draft is always read from the repository and the
    /// cached copy is overwritten with it, or dropped when the row is gone.
    /// Returns `NotFound` if absent.
    pub async fn load(&self, id: DraftId, bust_cache: bool) -> Result<Draft> {
        let draft = if bust_cache {
            let draft = self.repository.get_draft(id).await?;
            match &draft {
                Some(d) => self.populate(d).await,
                None => self.invalidate(id).await,
            }
            draft
        } else {
            self.get_draft(id).await?
        };

        draft.ok_or_else(|| RepositoryError::draft_not_found(id))
    }

    /// Writes a freshly read draft to the cache.
    ///
    /// Not atomic with the read: a writer that persists and invalidates
    /// between our read and this set leaves a stale entry behind. The entry
    /// lives until the next write to the draft or until the TTL expires.
    async fn populate(&self, draft: &Draft) {
        let cache_key = draft_key(draft.id);
        match serialize_draft(draft) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(&cache_key, &bytes, self.ttl).await {
                    tracing::warn!(draft_id = %draft.id, error = %err, "Failed to cache draft");
                }
            }
            Err(err) => {
                tracing::warn!(draft_id = %draft.id, error = %err, "Failed to serialize draft");
            }
        }
    }

    async fn invalidate(&self, id: DraftId) {
        if let Err(err) = self.cache.delete(&draft_key(id)).await {
            tracing::warn!(draft_id = %id, error = %err, "Failed to invalidate draft cache");
        }
    }
}

#[async_trait]
impl<R, C> DraftRepository for CachedDraftRepository<R, C>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    async fn get_draft(&self, id: DraftId) -> Result<Option<Draft>> {
        let cache_key = draft_key(id);

        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_draft(&bytes) {
                Ok(draft) => {
                    tracing::trace!(draft_id = %id, "Cache hit for draft");
                    return Ok(Some(draft));
                }
                Err(err) => {
                    tracing::warn!(
                        draft_id = %id,
                        error = %err,
                        "Cache draft deserialization failed"
                    );
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(draft_id = %id, error = %err, "Cache read failed");
            }
        }

        tracing::trace!(draft_id = %id, "Cache miss for draft");
        let draft = self.repository.get_draft(id).await?;

        if let Some(ref d) = draft {
            self.populate(d).await;
        }

        Ok(draft)
    }

    async fn list_drafts(&self, filter: &DraftFilter) -> Result<Vec<Draft>> {
        self.repository.list_drafts(filter).await
    }

    async fn create_draft(&self, settings: &DraftSettings) -> Result<DraftId> {
        let id = self.repository.create_draft(settings).await?;

        // Fresh read so the cache holds server-assigned fields (create time, defaults).
        if let Some(draft) = self.repository.get_draft(id).await? {
            self.populate(&draft).await;
        }

        tracing::debug!(draft_id = %id, name = %settings.name, "Draft created");
        Ok(id)
    }

    async fn update_draft(&self, id: DraftId, settings: &DraftSettings) -> Result<()> {
        self.repository.update_draft(id, settings).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, name = %settings.name, "Draft updated");
        Ok(())
    }

    async fn update_status(&self, id: DraftId, status: DraftStatus) -> Result<()> {
        self.repository.update_status(id, status).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, status = %status, "Draft status updated");
        Ok(())
    }

    async fn update_stats_timestamp(&self, id: DraftId) -> Result<()> {
        self.repository.update_stats_timestamp(id).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, "Draft stats timestamp updated");
        Ok(())
    }

    async fn increment_counter(&self, id: DraftId) -> Result<i64> {
        let counter = self.repository.increment_counter(id).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, counter, "Draft counter incremented");
        Ok(counter)
    }

    async fn advance_pick(&self, id: DraftId, next: NextPick) -> Result<()> {
        self.repository.advance_pick(id, next).await?;
        self.invalidate(id).await;

        tracing::debug!(
            draft_id = %id,
            round = next.round,
            pick = next.pick,
            "Draft moved forward"
        );
        Ok(())
    }

    async fn complete_draft(&self, id: DraftId) -> Result<()> {
        self.repository.complete_draft(id).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, "Draft completed");
        Ok(())
    }

    async fn set_in_progress(&self, id: DraftId) -> Result<()> {
        self.repository.set_in_progress(id).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, "Draft started");
        Ok(())
    }

    async fn name_is_unique(&self, name: &str, exclude: Option<DraftId>) -> Result<bool> {
        self.repository.name_is_unique(name, exclude).await
    }

    async fn delete_draft(&self, id: DraftId) -> Result<()> {
        self.repository.delete_draft(id).await?;
        self.invalidate(id).await;

        tracing::debug!(draft_id = %id, "Draft deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    use draftroom_core::cache::{CacheError, Result as CacheResult};
    use draftroom_core::draft::UserId;

    use crate::storage::inmemory::InMemoryRepository;

    // Repository that counts reads and delegates to the in-memory store
    struct CountingRepository {
        inner: InMemoryRepository,
        get_calls: AtomicUsize,
    }

    impl CountingRepository {
        fn new() -> Self {
            Self {
                inner: InMemoryRepository::new(),
                get_calls: AtomicUsize::new(0),
            }
        }

        fn gets(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DraftRepository for CountingRepository {
        async fn get_draft(&self, id: DraftId) -> Result<Option<Draft>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_draft(id).await
        }

        async fn list_drafts(&self, filter: &DraftFilter) -> Result<Vec<Draft>> {
            self.inner.list_drafts(filter).await
        }

        async fn create_draft(&self, settings: &DraftSettings) -> Result<DraftId> {
            self.inner.create_draft(settings).await
        }

        async fn update_draft(&self, id: DraftId, settings: &DraftSettings) -> Result<()> {
            self.inner.update_draft(id, settings).await
        }

        async fn update_status(&self, id: DraftId, status: DraftStatus) -> Result<()> {
            self.inner.update_status(id, status).await
        }

        async fn update_stats_timestamp(&self, id: DraftId) -> Result<()> {
            self.inner.update_stats_timestamp(id).await
        }

        async fn increment_counter(&self, id: DraftId) -> Result<i64> {
            self.inner.increment_counter(id).await
        }

        async fn advance_pick(&self, id: DraftId, next: NextPick) -> Result<()> {
            self.inner.advance_pick(id, next).await
        }

        async fn complete_draft(&self, id: DraftId) -> Result<()> {
            self.inner.complete_draft(id).await
        }

        async fn set_in_progress(&self, id: DraftId) -> Result<()> {
            self.inner.set_in_progress(id).await
        }

        async fn name_is_unique(&self, name: &str, exclude: Option<DraftId>) -> Result<bool> {
            self.inner.name_is_unique(name, exclude).await
        }

        async fn delete_draft(&self, id: DraftId) -> Result<()> {
            self.inner.delete_draft(id).await
        }
    }

    // Mock cache that can be switched into a failing state
    struct MockCache {
        store: RwLock<HashMap<String, Vec<u8>>>,
        broken: AtomicBool,
    }

    impl MockCache {
        fn new() -> Self {
            Self {
                store: RwLock::new(HashMap::new()),
                broken: AtomicBool::new(false),
            }
        }

        fn check(&self) -> CacheResult<()> {
            if self.broken.load(Ordering::SeqCst) {
                Err(CacheError::ConnectionFailed("cache down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            self.check()?;
            Ok(self.store.read().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            self.check()?;
            self.store
                .write()
                .await
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn delete(&self, key: &str) -> CacheResult<()> {
            self.check()?;
            self.store.write().await.remove(key);
            Ok(())
        }
    }

    type Cached = CachedDraftRepository<CountingRepository, MockCache>;

    fn setup() -> (Arc<CountingRepository>, Arc<MockCache>, Cached) {
        let repo = Arc::new(CountingRepository::new());
        let cache = Arc::new(MockCache::new());
        let cached = CachedDraftRepository::new(repo.clone(), cache.clone(), None);
        (repo, cache, cached)
    }

    fn settings() -> DraftSettings {
        DraftSettings::new(UserId(1), "Test League", "football", "serpentine", 10)
    }

    /// Creates a draft behind the decorator's back so the cache starts empty.
    async fn seed(repo: &CountingRepository) -> DraftId {
        repo.inner.create_draft(&settings()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_draft_cache_miss() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;

        let result = cached.get_draft(id).await.unwrap();

        assert_eq!(result.map(|d| d.id), Some(id));
        assert_eq!(repo.gets(), 1);
        assert!(cache.store.read().await.contains_key(&draft_key(id)));
    }

    #[tokio::test]
    async fn test_get_draft_cache_hit() {
        let (repo, _cache, cached) = setup();
        let id = seed(&repo).await;

        let _ = cached.get_draft(id).await.unwrap();
        let result = cached.get_draft(id).await.unwrap();

        assert_eq!(result.map(|d| d.id), Some(id));
        assert_eq!(repo.gets(), 1);
    }

    #[tokio::test]
    async fn test_missing_draft_not_cached() {
        let (repo, cache, cached) = setup();

        assert!(cached.get_draft(DraftId(9)).await.unwrap().is_none());
        assert!(cached.get_draft(DraftId(9)).await.unwrap().is_none());

        assert_eq!(repo.gets(), 2);
        assert!(cache.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_a_miss() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        cache.set(&draft_key(id), b"garbage", None).await.unwrap();

        let result = cached.get_draft(id).await.unwrap();

        assert_eq!(result.map(|d| d.name), Some("Test League".to_string()));
        assert_eq!(repo.gets(), 1);
        // Repopulated with a good copy
        let bytes = cache.store.read().await.get(&draft_key(id)).cloned().unwrap();
        assert!(deserialize_draft(&bytes).is_ok());
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_repository() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        cache.broken.store(true, Ordering::SeqCst);

        assert!(cached.get_draft(id).await.unwrap().is_some());
        assert_eq!(cached.increment_counter(id).await.unwrap(), 1);
        cached.update_status(id, DraftStatus::Complete).await.unwrap();

        assert_eq!(repo.gets(), 1);
    }

    #[tokio::test]
    async fn test_create_populates_cache_with_fresh_read() {
        let (repo, cache, cached) = setup();

        let id = cached.create_draft(&settings()).await.unwrap();

        assert_eq!(repo.gets(), 1);
        let bytes = cache.store.read().await.get(&draft_key(id)).cloned().unwrap();
        let draft = deserialize_draft(&bytes).unwrap();
        assert_eq!(draft.status, DraftStatus::SettingUp);

        // Served from cache
        cached.get_draft(id).await.unwrap();
        assert_eq!(repo.gets(), 1);
    }

    #[tokio::test]
    async fn test_every_mutation_invalidates_cache() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        let key = draft_key(id);

        let mutations: Vec<&str> = vec![
            "update",
            "status",
            "stats",
            "counter",
            "advance",
            "complete",
            "start",
        ];
        for mutation in mutations {
            cached.get_draft(id).await.unwrap();
            assert!(cache.store.read().await.contains_key(&key));

            match mutation {
                "update" => cached.update_draft(id, &settings().with_rounds(12)).await.unwrap(),
                "status" => cached.update_status(id, DraftStatus::InProgress).await.unwrap(),
                "stats" => cached.update_stats_timestamp(id).await.unwrap(),
                "counter" => {
                    cached.increment_counter(id).await.unwrap();
                }
                "advance" => cached.advance_pick(id, NextPick::new(2, 1)).await.unwrap(),
                "complete" => cached.complete_draft(id).await.unwrap(),
                _ => cached.set_in_progress(id).await.unwrap(),
            }

            assert!(
                !cache.store.read().await.contains_key(&key),
                "{mutation} left a stale cache entry"
            );
        }
    }

    #[tokio::test]
    async fn test_read_after_write_sees_write() {
        let (repo, _cache, cached) = setup();
        let id = seed(&repo).await;

        cached.set_in_progress(id).await.unwrap();
        assert_eq!(cached.get_draft(id).await.unwrap().unwrap().current_pick, 1);

        cached.advance_pick(id, NextPick::new(1, 2)).await.unwrap();
        assert_eq!(cached.get_draft(id).await.unwrap().unwrap().current_pick, 2);

        cached.increment_counter(id).await.unwrap();
        assert_eq!(cached.get_draft(id).await.unwrap().unwrap().counter, 1);
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        cached.get_draft(id).await.unwrap();

        cached.delete_draft(id).await.unwrap();

        assert!(!cache.store.read().await.contains_key(&draft_key(id)));
        assert!(cached.get_draft(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cache() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        let other = repo
            .inner
            .create_draft(&settings().with_name("Other"))
            .await
            .unwrap();
        cached.get_draft(id).await.unwrap();

        // Renaming onto an existing name fails in the store
        let err = cached
            .update_draft(id, &settings().with_name("other"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
        assert!(cache.store.read().await.contains_key(&draft_key(id)));
        assert_ne!(id, other);
    }

    #[tokio::test]
    async fn test_load_with_bust_refetches_and_repopulates() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        cached.get_draft(id).await.unwrap();

        // Change the row without going through the decorator
        repo.inner.increment_counter(id).await.unwrap();

        let stale = cached.load(id, false).await.unwrap();
        assert_eq!(stale.counter, 0);

        let fresh = cached.load(id, true).await.unwrap();
        assert_eq!(fresh.counter, 1);
        assert_eq!(repo.gets(), 2);

        let bytes = cache.store.read().await.get(&draft_key(id)).cloned().unwrap();
        assert_eq!(deserialize_draft(&bytes).unwrap().counter, 1);
    }

    #[tokio::test]
    async fn test_load_with_bust_drops_entry_for_deleted_row() {
        let (repo, cache, cached) = setup();
        let id = seed(&repo).await;
        cached.get_draft(id).await.unwrap();

        // Remove the row without going through the decorator
        repo.inner.delete_draft(id).await.unwrap();
        assert!(cached.load(id, false).await.is_ok());

        let err = cached.load(id, true).await.unwrap_err();
        assert_eq!(err, RepositoryError::draft_not_found(id.0));
        assert!(!cache.store.read().await.contains_key(&draft_key(id)));
        assert_eq!(
            cached.load(id, false).await.unwrap_err(),
            RepositoryError::draft_not_found(id.0)
        );
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (_repo, _cache, cached) = setup();

        for bust in [false, true] {
            let err = cached.load(DraftId(77), bust).await.unwrap_err();
            assert_eq!(err, RepositoryError::draft_not_found(77));
        }
    }
}
