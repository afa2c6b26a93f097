//! Client-facing projections of a draft.
//!
//! [`NormalizedDraft`] is the trusted projection: display fields derived,
//! password included. [`DraftView`] is what leaves the subsystem; it is built
//! by [`secure`] and has no password field in either variant.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::reference::DraftLookups;

use super::display::TimeDisplay;
use super::operations::normalize;
use super::types::{Draft, DraftId, DraftStatus, UserId};

/// Status as shown to a client. `Locked` replaces the real status when the
/// viewer may not see the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    SettingUp,
    InProgress,
    Complete,
    Locked,
}

impl ViewStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ViewStatus::SettingUp => DraftStatus::SettingUp.display_name(),
            ViewStatus::InProgress => DraftStatus::InProgress.display_name(),
            ViewStatus::Complete => DraftStatus::Complete.display_name(),
            ViewStatus::Locked => "Locked",
        }
    }
}

impl From<DraftStatus> for ViewStatus {
    fn from(status: DraftStatus) -> Self {
        match status {
            DraftStatus::SettingUp => ViewStatus::SettingUp,
            DraftStatus::InProgress => ViewStatus::InProgress,
            DraftStatus::Complete => ViewStatus::Complete,
        }
    }
}

/// A draft with derived display fields, for trusted (admin) callers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDraft {
    pub id: DraftId,
    pub commish_id: UserId,
    pub commish_name: Option<String>,
    pub name: String,
    pub sport: String,
    pub style: String,
    pub status: DraftStatus,
    pub display_status: String,
    pub setting_up: bool,
    pub in_progress: bool,
    pub complete: bool,
    pub rounds: i64,
    pub password: Option<String>,
    pub using_depth_charts: bool,
    pub create_time: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub counter: i64,
    pub current_pick: i64,
    pub current_round: i64,
    pub stats_generated: Option<String>,
}

impl NormalizedDraft {
    pub fn with_commish_name(mut self, name: Option<String>) -> Self {
        self.commish_name = name;
        self
    }
}

/// Who is asking to see a draft, and with which password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessContext<'a> {
    pub viewer: Option<UserId>,
    pub is_admin: bool,
    pub password: Option<&'a str>,
}

impl<'a> AccessContext<'a> {
    /// No identity and no password.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_identity(identity: Option<&Identity>, is_admin: bool) -> Self {
        Self {
            viewer: identity.map(|i| i.user_id),
            is_admin,
            password: None,
        }
    }

    pub fn with_password(mut self, password: Option<&'a str>) -> Self {
        self.password = password;
        self
    }
}

/// Full view of a draft the viewer may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDetails {
    pub id: DraftId,
    pub commish_id: UserId,
    pub commish_name: Option<String>,
    pub name: String,
    pub sport: String,
    pub style: String,
    pub status: ViewStatus,
    pub display_status: String,
    pub setting_up: bool,
    pub in_progress: bool,
    pub complete: bool,
    pub rounds: i64,
    pub using_depth_charts: bool,
    pub create_time: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub counter: i64,
    pub current_pick: i64,
    pub current_round: i64,
    pub stats_generated: Option<String>,
    pub draft_visible: bool,
    pub commish_editable: bool,
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookups: Option<DraftLookups>,
}

/// What a viewer without access learns about a password-protected draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSummary {
    pub id: DraftId,
    pub commish_id: UserId,
    pub commish_name: Option<String>,
    pub name: String,
    pub create_time: String,
    pub status: ViewStatus,
    pub display_status: String,
    pub draft_visible: bool,
    pub commish_editable: bool,
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftView {
    Full(DraftDetails),
    Locked(DraftSummary),
}

impl DraftView {
    pub fn id(&self) -> DraftId {
        match self {
            DraftView::Full(d) => d.id,
            DraftView::Locked(s) => s.id,
        }
    }

    pub fn status(&self) -> ViewStatus {
        match self {
            DraftView::Full(d) => d.status,
            DraftView::Locked(s) => s.status,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, DraftView::Locked(_))
    }

    pub fn details(&self) -> Option<&DraftDetails> {
        match self {
            DraftView::Full(d) => Some(d),
            DraftView::Locked(_) => None,
        }
    }

    /// Attaches lookup collections. Locked views are returned unchanged.
    pub fn with_lookups(self, lookups: DraftLookups) -> Self {
        match self {
            DraftView::Full(mut d) => {
                d.lookups = Some(lookups);
                DraftView::Full(d)
            }
            locked => locked,
        }
    }
}

/// Applies the access rules to a normalized draft.
///
/// The viewer may edit when they own the draft or are an admin. A draft with
/// no password is visible to everyone. Anyone else gets the locked summary
/// unless they supplied the exact stored password.
pub fn secure(draft: NormalizedDraft, ctx: &AccessContext<'_>) -> DraftView {
    let is_owner = ctx.viewer == Some(draft.commish_id);
    let commish_editable = is_owner || ctx.is_admin;
    let stored = draft.password.as_deref().unwrap_or_default();
    let draft_visible = stored.is_empty();
    let password_matches = ctx.password.is_some_and(|p| p == stored);

    if !commish_editable && !draft_visible && !password_matches {
        return DraftView::Locked(DraftSummary {
            id: draft.id,
            commish_id: draft.commish_id,
            commish_name: draft.commish_name,
            name: draft.name,
            create_time: draft.create_time,
            status: ViewStatus::Locked,
            display_status: ViewStatus::Locked.display_name().to_string(),
            draft_visible: false,
            commish_editable: false,
            is_locked: true,
        });
    }

    DraftView::Full(DraftDetails {
        id: draft.id,
        commish_id: draft.commish_id,
        commish_name: draft.commish_name,
        name: draft.name,
        sport: draft.sport,
        style: draft.style,
        status: draft.status.into(),
        display_status: draft.display_status,
        setting_up: draft.setting_up,
        in_progress: draft.in_progress,
        complete: draft.complete,
        rounds: draft.rounds,
        using_depth_charts: draft.using_depth_charts,
        create_time: draft.create_time,
        start_time: draft.start_time,
        end_time: draft.end_time,
        counter: draft.counter,
        current_pick: draft.current_pick,
        current_round: draft.current_round,
        stats_generated: draft.stats_generated,
        draft_visible,
        commish_editable,
        is_locked: false,
        lookups: None,
    })
}

/// Normalizes a draft and applies the access rules in one step.
pub fn build_view(draft: &Draft, ctx: &AccessContext<'_>, time: &dyn TimeDisplay) -> DraftView {
    secure(normalize(draft, time), ctx)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::draft::OffsetTimeDisplay;

    fn draft(password: Option<&str>) -> Draft {
        Draft {
            id: DraftId(7),
            commish_id: UserId(1),
            name: "Private League".to_string(),
            sport: "football".to_string(),
            style: "serpentine".to_string(),
            status: DraftStatus::InProgress,
            rounds: 12,
            password: password.map(str::to_string),
            using_depth_charts: true,
            create_time: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
            start_time: Some(Utc.with_ymd_and_hms(2024, 8, 2, 12, 0, 0).unwrap()),
            end_time: None,
            counter: 9,
            current_pick: 10,
            current_round: 1,
            stats_generated: None,
        }
    }

    fn view(draft: &Draft, ctx: AccessContext<'_>) -> DraftView {
        build_view(draft, &ctx, &OffsetTimeDisplay::utc())
    }

    fn stranger() -> AccessContext<'static> {
        AccessContext {
            viewer: Some(UserId(99)),
            is_admin: false,
            password: None,
        }
    }

    #[test]
    fn test_protected_draft_locked_for_stranger_without_password() {
        let v = view(&draft(Some("secret")), stranger());

        assert!(v.is_locked());
        assert_eq!(v.status(), ViewStatus::Locked);
        let DraftView::Locked(summary) = &v else {
            panic!("expected locked view");
        };
        assert_eq!(summary.display_status, "Locked");
        assert!(!summary.draft_visible);
        assert!(!summary.commish_editable);
    }

    #[test]
    fn test_protected_draft_locked_for_wrong_password() {
        let v = view(&draft(Some("secret")), stranger().with_password(Some("guess")));
        assert!(v.is_locked());
    }

    #[test]
    fn test_protected_draft_locked_for_anonymous() {
        let v = view(&draft(Some("secret")), AccessContext::anonymous());
        assert!(v.is_locked());
    }

    #[test]
    fn test_locked_json_withholds_sensitive_fields() {
        let v = view(&draft(Some("secret")), stranger());
        let json = serde_json::to_value(&v).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["status"], "locked");
        assert_eq!(obj["name"], "Private League");
        for withheld in [
            "password",
            "sport",
            "style",
            "rounds",
            "counter",
            "current_pick",
            "current_round",
            "start_time",
            "end_time",
            "lookups",
        ] {
            assert!(!obj.contains_key(withheld), "{withheld} leaked");
        }
    }

    #[test]
    fn test_matching_password_unlocks() {
        let v = view(&draft(Some("secret")), stranger().with_password(Some("secret")));

        let details = v.details().unwrap();
        assert_eq!(details.status, ViewStatus::InProgress);
        assert_eq!(details.current_pick, 10);
        assert!(!details.draft_visible);
        assert!(!details.commish_editable);
    }

    #[test]
    fn test_public_draft_visible_to_everyone() {
        for ctx in [AccessContext::anonymous(), stranger()] {
            let v = view(&draft(None), ctx);
            let details = v.details().unwrap();
            assert!(details.draft_visible);
            assert!(!details.is_locked);
        }
    }

    #[test]
    fn test_empty_password_counts_as_public() {
        let v = view(&draft(Some("")), AccessContext::anonymous());
        assert!(v.details().unwrap().draft_visible);
    }

    #[test]
    fn test_owner_sees_everything() {
        let ctx = AccessContext {
            viewer: Some(UserId(1)),
            is_admin: false,
            password: None,
        };
        let v = view(&draft(Some("secret")), ctx);

        let details = v.details().unwrap();
        assert!(details.commish_editable);
        assert_eq!(details.sport, "football");
    }

    #[test]
    fn test_admin_sees_everything() {
        let ctx = AccessContext {
            viewer: Some(UserId(50)),
            is_admin: true,
            password: None,
        };
        let v = view(&draft(Some("secret")), ctx);
        assert!(v.details().unwrap().commish_editable);
    }

    #[test]
    fn test_full_view_never_serializes_password() {
        let ctx = AccessContext::for_identity(None, true);
        let json = serde_json::to_value(view(&draft(Some("secret")), ctx)).unwrap();
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn test_commish_name_survives_locking() {
        let d = draft(Some("secret"));
        let named = || {
            normalize(&d, &OffsetTimeDisplay::utc())
                .with_commish_name(Some("Jordan".to_string()))
        };

        let locked = secure(named(), &stranger());
        let DraftView::Locked(summary) = &locked else {
            panic!("expected locked view");
        };
        assert_eq!(summary.commish_name.as_deref(), Some("Jordan"));

        let full = secure(named(), &stranger().with_password(Some("secret")));
        assert_eq!(full.details().unwrap().commish_name.as_deref(), Some("Jordan"));
    }

    #[test]
    fn test_lookups_not_attached_to_locked_view() {
        let v = view(&draft(Some("secret")), stranger()).with_lookups(DraftLookups::default());
        assert!(v.is_locked());
        assert!(v.details().is_none());
    }

    #[test]
    fn test_lookups_attached_to_full_view() {
        let v = view(&draft(None), stranger()).with_lookups(DraftLookups::default());
        assert!(v.details().unwrap().lookups.is_some());
    }
}
