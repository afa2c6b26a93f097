//! Mutating operations. Each returns the entity as re-read after the write.

use draftroom_core::cache::Cache;
use draftroom_core::draft::{
    prepare_settings, DepthChartPosition, DepthChartSlot, Draft, DraftError, DraftId,
    DraftSettings, DraftStatus, NextPick,
};
use draftroom_core::storage::DraftRepository;

use super::{DraftAccess, Result};

impl<R, C> DraftAccess<R, C>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    /// Validates and inserts a new draft in `setting_up`.
    pub async fn create_draft(&self, settings: DraftSettings) -> Result<Draft> {
        let settings = prepare_settings(settings)?;
        self.ensure_unique_name(&settings.name, None).await?;

        let id = self.drafts.create_draft(&settings).await?;
        Ok(self.drafts.load(id, false).await?)
    }

    /// Overwrites the editable fields of a draft.
    pub async fn update_draft(&self, id: DraftId, settings: DraftSettings) -> Result<Draft> {
        let settings = prepare_settings(settings)?;
        self.drafts.load(id, false).await?;
        self.ensure_unique_name(&settings.name, Some(id)).await?;

        self.drafts.update_draft(id, &settings).await?;
        Ok(self.drafts.load(id, false).await?)
    }

    /// Administrative status change; touches nothing but the status.
    pub async fn update_status(&self, id: DraftId, status: DraftStatus) -> Result<Draft> {
        self.drafts.update_status(id, status).await?;
        Ok(self.drafts.load(id, false).await?)
    }

    pub async fn update_stats_timestamp(&self, id: DraftId) -> Result<Draft> {
        self.drafts.update_stats_timestamp(id).await?;
        Ok(self.drafts.load(id, false).await?)
    }

    /// Records a pick and returns the new counter value.
    pub async fn increment_draft_counter(&self, id: DraftId) -> Result<i64> {
        Ok(self.drafts.increment_counter(id).await?)
    }

    /// Moves to the next pick, or completes the draft when there is none.
    pub async fn move_draft_forward(&self, id: DraftId, next: Option<NextPick>) -> Result<Draft> {
        match next {
            Some(next) => self.drafts.advance_pick(id, next).await?,
            None => self.drafts.complete_draft(id).await?,
        }
        Ok(self.drafts.load(id, false).await?)
    }

    /// Starts the draft from the first pick of the first round.
    pub async fn set_draft_in_progress(&self, id: DraftId) -> Result<Draft> {
        self.drafts.set_in_progress(id).await?;
        Ok(self.drafts.load(id, false).await?)
    }

    /// Returns true if no draft other than `exclude` uses `name`, ignoring case.
    pub async fn name_is_unique(&self, name: &str, exclude: Option<DraftId>) -> Result<bool> {
        Ok(self.drafts.name_is_unique(name.trim(), exclude).await?)
    }

    pub async fn delete_draft(&self, id: DraftId) -> Result<()> {
        Ok(self.drafts.delete_draft(id).await?)
    }

    /// Replaces the draft's depth-chart layout.
    pub async fn set_depth_chart_positions(
        &self,
        id: DraftId,
        slots: &[DepthChartSlot],
    ) -> Result<Vec<DepthChartPosition>> {
        Ok(self.depth_charts.replace_positions(id, slots).await?)
    }

    async fn ensure_unique_name(&self, name: &str, exclude: Option<DraftId>) -> Result<()> {
        if self.drafts.name_is_unique(name, exclude).await? {
            Ok(())
        } else {
            tracing::debug!(name = %name, "Rejected duplicate draft name");
            Err(DraftError::DuplicateName(name.to_string()).into())
        }
    }
}
