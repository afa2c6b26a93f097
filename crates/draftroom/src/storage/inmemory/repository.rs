//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use draftroom_core::draft::{
    name_key, DepthChartPosition, DepthChartSlot, Draft, DraftId, DraftSettings, DraftStatus,
    NextPick,
};
use draftroom_core::storage::{
    DepthChartRepository, DraftFilter, DraftRepository, RepositoryError, Result,
};

#[derive(Debug, Default)]
struct State {
    drafts: BTreeMap<DraftId, Draft>,
    positions: HashMap<DraftId, Vec<DepthChartPosition>>,
    last_draft_id: i64,
    last_position_id: i64,
}

impl State {
    fn draft_mut(&mut self, id: DraftId) -> Result<&mut Draft> {
        self.drafts
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::draft_not_found(id))
    }

    fn name_taken(&self, name: &str, exclude: Option<DraftId>) -> bool {
        let key = name_key(name);
        self.drafts
            .values()
            .any(|d| Some(d.id) != exclude && name_key(&d.name) == key)
    }
}

/// In-memory storage backend.
///
/// Uses a single `Arc<RwLock<_>>` so every operation is atomic.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryRepository {
    async fn get_draft(&self, id: DraftId) -> Result<Option<Draft>> {
        Ok(self.state.read().await.drafts.get(&id).cloned())
    }

    async fn list_drafts(&self, filter: &DraftFilter) -> Result<Vec<Draft>> {
        let state = self.state.read().await;
        let mut drafts: Vec<Draft> = state
            .drafts
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        drafts.sort_by(|a, b| b.create_time.cmp(&a.create_time).then(b.id.cmp(&a.id)));
        Ok(drafts)
    }

    async fn create_draft(&self, settings: &DraftSettings) -> Result<DraftId> {
        let mut state = self.state.write().await;
        if state.name_taken(&settings.name, None) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Draft",
                id: settings.name.clone(),
            });
        }

        state.last_draft_id += 1;
        let id = DraftId(state.last_draft_id);
        state.drafts.insert(
            id,
            Draft {
                id,
                commish_id: settings.commish_id,
                name: settings.name.clone(),
                sport: settings.sport.clone(),
                style: settings.style.clone(),
                status: DraftStatus::SettingUp,
                rounds: settings.rounds,
                password: settings.password.clone(),
                using_depth_charts: settings.using_depth_charts,
                create_time: Utc::now(),
                start_time: None,
                end_time: None,
                counter: 0,
                current_pick: 0,
                current_round: 0,
                stats_generated: None,
            },
        );
        Ok(id)
    }

    async fn update_draft(&self, id: DraftId, settings: &DraftSettings) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.drafts.contains_key(&id) {
            return Err(RepositoryError::draft_not_found(id));
        }
        if state.name_taken(&settings.name, Some(id)) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Draft",
                id: id.to_string(),
            });
        }

        let draft = state.draft_mut(id)?;
        draft.commish_id = settings.commish_id;
        draft.name = settings.name.clone();
        draft.sport = settings.sport.clone();
        draft.style = settings.style.clone();
        draft.rounds = settings.rounds;
        draft.password = settings.password.clone();
        draft.using_depth_charts = settings.using_depth_charts;
        Ok(())
    }

    async fn update_status(&self, id: DraftId, status: DraftStatus) -> Result<()> {
        self.state.write().await.draft_mut(id)?.status = status;
        Ok(())
    }

    async fn update_stats_timestamp(&self, id: DraftId) -> Result<()> {
        self.state.write().await.draft_mut(id)?.stats_generated = Some(Utc::now());
        Ok(())
    }

    async fn increment_counter(&self, id: DraftId) -> Result<i64> {
        let mut state = self.state.write().await;
        let draft = state.draft_mut(id)?;
        draft.counter += 1;
        Ok(draft.counter)
    }

    async fn advance_pick(&self, id: DraftId, next: NextPick) -> Result<()> {
        let mut state = self.state.write().await;
        let draft = state.draft_mut(id)?;
        draft.current_round = next.round;
        draft.current_pick = next.pick;
        Ok(())
    }

    async fn complete_draft(&self, id: DraftId) -> Result<()> {
        let mut state = self.state.write().await;
        let draft = state.draft_mut(id)?;
        draft.status = DraftStatus::Complete;
        draft.end_time = Some(Utc::now());
        Ok(())
    }

    async fn set_in_progress(&self, id: DraftId) -> Result<()> {
        let mut state = self.state.write().await;
        let draft = state.draft_mut(id)?;
        draft.status = DraftStatus::InProgress;
        draft.counter = 0;
        draft.current_pick = 1;
        draft.current_round = 1;
        draft.start_time = Some(Utc::now());
        draft.end_time = None;
        Ok(())
    }

    async fn name_is_unique(&self, name: &str, exclude: Option<DraftId>) -> Result<bool> {
        Ok(!self.state.read().await.name_taken(name, exclude))
    }

    async fn delete_draft(&self, id: DraftId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .drafts
            .remove(&id)
            .ok_or_else(|| RepositoryError::draft_not_found(id))?;
        state.positions.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl DepthChartRepository for InMemoryRepository {
    async fn get_positions(&self, draft_id: DraftId) -> Result<Vec<DepthChartPosition>> {
        let state = self.state.read().await;
        Ok(state.positions.get(&draft_id).cloned().unwrap_or_default())
    }

    async fn replace_positions(
        &self,
        draft_id: DraftId,
        slots: &[DepthChartSlot],
    ) -> Result<Vec<DepthChartPosition>> {
        let mut state = self.state.write().await;
        if !state.drafts.contains_key(&draft_id) {
            return Err(RepositoryError::draft_not_found(draft_id));
        }

        let mut positions = Vec::with_capacity(slots.len());
        for (order, slot) in slots.iter().enumerate() {
            state.last_position_id += 1;
            positions.push(DepthChartPosition {
                id: state.last_position_id,
                draft_id,
                position: slot.position.clone(),
                slots: slot.slots,
                display_order: order as i64,
            });
        }
        state.positions.insert(draft_id, positions.clone());
        Ok(positions)
    }
}
