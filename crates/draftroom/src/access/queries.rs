//! Read operations.
//!
//! Public reads pass every draft through the view builder. The admin reads
//! return [`NormalizedDraft`] and must only be reachable by trusted callers;
//! gate them with [`DraftAccess::require_admin`].

use draftroom_core::cache::Cache;
use draftroom_core::draft::{
    secure, Draft, DraftId, DraftStatus, DraftView, NormalizedDraft, UserId,
};
use draftroom_core::reference::collect_lookups;
use draftroom_core::storage::{DraftFilter, DraftRepository};

use super::{DraftAccess, Result};

impl<R, C> DraftAccess<R, C>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    /// Gets one draft as the requester may see it.
    ///
    /// With `include_lookups`, reference tables for the draft's sport (and its
    /// depth-chart positions, when enabled) are attached to unlocked views.
    pub async fn get_public_draft(
        &self,
        token: Option<&str>,
        id: DraftId,
        include_lookups: bool,
        password: Option<&str>,
    ) -> Result<DraftView> {
        let draft = self.drafts.load(id, false).await?;
        let view = secure(self.normalized(&draft), &self.context(token, password));

        if !include_lookups || view.is_locked() {
            return Ok(view);
        }

        let mut lookups = collect_lookups(self.reference.as_ref(), &draft.sport);
        if draft.using_depth_charts {
            lookups.depth_chart_positions = Some(self.depth_charts.get_positions(id).await?);
        }
        Ok(view.with_lookups(lookups))
    }

    /// Trusted raw read. `bust_cache` forces a store read and re-caches it.
    pub async fn load(&self, id: DraftId, bust_cache: bool) -> Result<Draft> {
        Ok(self.drafts.load(id, bust_cache).await?)
    }

    /// Every draft, newest first, as the requester may see it.
    pub async fn get_public_drafts(
        &self,
        token: Option<&str>,
        password: Option<&str>,
    ) -> Result<Vec<DraftView>> {
        self.public_list(&DraftFilter::all(), token, password).await
    }

    /// One commissioner's drafts, newest first, as the requester may see them.
    pub async fn get_public_drafts_by_commish(
        &self,
        token: Option<&str>,
        commish_id: UserId,
        password: Option<&str>,
    ) -> Result<Vec<DraftView>> {
        self.public_list(&DraftFilter::by_commish(commish_id), token, password)
            .await
    }

    /// Admin listing of one commissioner's drafts, passwords included.
    pub async fn get_all_drafts_by_commish(
        &self,
        commish_id: UserId,
    ) -> Result<Vec<NormalizedDraft>> {
        self.normalized_list(&DraftFilter::by_commish(commish_id))
            .await
    }

    /// Admin listing of every completed draft, passwords included.
    pub async fn get_all_completed_drafts(&self) -> Result<Vec<NormalizedDraft>> {
        self.normalized_list(&DraftFilter::by_status(DraftStatus::Complete))
            .await
    }

    async fn public_list(
        &self,
        filter: &DraftFilter,
        token: Option<&str>,
        password: Option<&str>,
    ) -> Result<Vec<DraftView>> {
        let ctx = self.context(token, password);
        let drafts = self.drafts.list_drafts(filter).await?;
        Ok(drafts
            .iter()
            .map(|d| secure(self.normalized(d), &ctx))
            .collect())
    }

    async fn normalized_list(&self, filter: &DraftFilter) -> Result<Vec<NormalizedDraft>> {
        let drafts = self.drafts.list_drafts(filter).await?;
        Ok(drafts
            .iter()
            .map(|d| self.normalized(d))
            .collect())
    }
}
