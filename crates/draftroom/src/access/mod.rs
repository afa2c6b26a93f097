//! Draft access facade.
//!
//! [`DraftAccess`] is the single entry point for the draft subsystem. Writes
//! go through the cached repository (persist, then invalidate); reads come
//! back through the cache and are passed through the view builder before
//! they leave.

mod error;
mod queries;
mod store;

use std::sync::Arc;

use draftroom_core::cache::Cache;
use draftroom_core::draft::{
    normalize, AccessContext, Draft, DraftId, NormalizedDraft, TimeDisplay,
};
use draftroom_core::identity::{Identity, IdentityResolver, UserDirectory};
use draftroom_core::reference::ReferenceData;
use draftroom_core::storage::{DepthChartRepository, DraftRepository};

use crate::storage::CachedDraftRepository;

pub use error::{AccessError, Result};

/// Orchestrates the draft store, cache and view builder.
///
/// Every collaborator is injected; the facade holds no state of its own
/// beyond them, so it can be shared behind an `Arc`.
pub struct DraftAccess<R, C>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    drafts: CachedDraftRepository<R, C>,
    identity: Arc<dyn IdentityResolver>,
    users: Arc<dyn UserDirectory>,
    time: Arc<dyn TimeDisplay>,
    reference: Arc<dyn ReferenceData>,
    depth_charts: Arc<dyn DepthChartRepository>,
}

impl<R, C> DraftAccess<R, C>
where
    R: DraftRepository + 'static,
    C: Cache + 'static,
{
    pub fn new(
        drafts: CachedDraftRepository<R, C>,
        identity: Arc<dyn IdentityResolver>,
        users: Arc<dyn UserDirectory>,
        time: Arc<dyn TimeDisplay>,
        reference: Arc<dyn ReferenceData>,
        depth_charts: Arc<dyn DepthChartRepository>,
    ) -> Self {
        Self {
            drafts,
            identity,
            users,
            time,
            reference,
            depth_charts,
        }
    }

    /// Loads a draft the requester may modify: its commissioner or an admin.
    ///
    /// Anonymous and unrelated callers get [`AccessError::Forbidden`]; a
    /// missing draft is still [`AccessError::NotFound`].
    pub async fn authorize(&self, token: Option<&str>, id: DraftId) -> Result<Draft> {
        let draft = self.drafts.load(id, false).await?;
        let identity = self.resolve(token);
        let allowed = identity
            .as_ref()
            .is_some_and(|i| i.user_id == draft.commish_id || self.identity.is_admin(i));

        if !allowed {
            tracing::warn!(draft_id = %id, "Rejected modification by non-owner");
            return Err(AccessError::Forbidden(id));
        }
        Ok(draft)
    }

    /// Resolves the requester and insists on the admin role.
    pub fn require_admin(&self, token: Option<&str>) -> Result<Identity> {
        self.resolve(token)
            .filter(|i| self.identity.is_admin(i))
            .ok_or(AccessError::AdminRequired)
    }

    fn resolve(&self, token: Option<&str>) -> Option<Identity> {
        token.and_then(|t| self.identity.resolve(t))
    }

    /// Resolves the request token into the view builder's access context.
    fn context<'a>(&self, token: Option<&str>, password: Option<&'a str>) -> AccessContext<'a> {
        let identity = self.resolve(token);
        let is_admin = identity
            .as_ref()
            .is_some_and(|i| self.identity.is_admin(i));
        AccessContext::for_identity(identity.as_ref(), is_admin).with_password(password)
    }

    /// Normalizes a draft and attaches its commissioner's display name.
    fn normalized(&self, draft: &Draft) -> NormalizedDraft {
        normalize(draft, self.time.as_ref())
            .with_commish_name(self.users.commish_name(draft.commish_id))
    }
}
