use async_trait::async_trait;

use crate::draft::{
    DepthChartPosition, DepthChartSlot, Draft, DraftId, DraftSettings, DraftStatus, NextPick,
};

use super::{DraftFilter, Result};

/// Repository for draft persistence.
///
/// Every mutating method targets a single row and is atomic on its own.
/// Mutations on a missing id return [`RepositoryError::NotFound`](super::RepositoryError).
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Gets a draft by its ID.
    async fn get_draft(&self, id: DraftId) -> Result<Option<Draft>>;

    /// Lists drafts matching the filter, newest first (ties by id, descending).
    async fn list_drafts(&self, filter: &DraftFilter) -> Result<Vec<Draft>>;

    /// Inserts a new draft in `setting_up` with a zeroed counter and returns its ID.
    async fn create_draft(&self, settings: &DraftSettings) -> Result<DraftId>;

    /// Overwrites the editable fields of a draft.
    ///
    /// Status, times, counter and pick position are left untouched.
    async fn update_draft(&self, id: DraftId, settings: &DraftSettings) -> Result<()>;

    /// Sets the status without touching anything else.
    async fn update_status(&self, id: DraftId, status: DraftStatus) -> Result<()>;

    /// Stamps the stats-generated time with the current UTC time.
    async fn update_stats_timestamp(&self, id: DraftId) -> Result<()>;

    /// Atomically increments the pick counter and returns the new value.
    async fn increment_counter(&self, id: DraftId) -> Result<i64>;

    /// Moves the draft to the given pick and round.
    async fn advance_pick(&self, id: DraftId, next: NextPick) -> Result<()>;

    /// Marks the draft complete and stamps its end time.
    async fn complete_draft(&self, id: DraftId) -> Result<()>;

    /// Starts (or restarts) the draft: counter 0, round 1, pick 1, start time
    /// now, end time cleared, status `in_progress`.
    async fn set_in_progress(&self, id: DraftId) -> Result<()>;

    /// Returns true if no draft other than `exclude` has this name, ignoring case.
    async fn name_is_unique(&self, name: &str, exclude: Option<DraftId>) -> Result<bool>;

    /// Deletes a draft and its depth-chart positions.
    async fn delete_draft(&self, id: DraftId) -> Result<()>;
}

/// Repository for the depth-chart positions configured on a draft.
#[async_trait]
pub trait DepthChartRepository: Send + Sync {
    /// Gets a draft's positions ordered by display order.
    async fn get_positions(&self, draft_id: DraftId) -> Result<Vec<DepthChartPosition>>;

    /// Replaces every position of a draft; slice order becomes display order.
    async fn replace_positions(
        &self,
        draft_id: DraftId,
        slots: &[DepthChartSlot],
    ) -> Result<Vec<DepthChartPosition>>;
}
