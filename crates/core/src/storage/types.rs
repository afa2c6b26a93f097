use crate::draft::{Draft, DraftStatus, UserId};

/// Narrows a draft listing by owner and/or status. The default matches every draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftFilter {
    pub commish_id: Option<UserId>,
    pub status: Option<DraftStatus>,
}

impl DraftFilter {
    /// Matches every draft.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches drafts owned by the given commissioner.
    pub fn by_commish(commish_id: UserId) -> Self {
        Self {
            commish_id: Some(commish_id),
            status: None,
        }
    }

    /// Matches drafts in the given status.
    pub fn by_status(status: DraftStatus) -> Self {
        Self {
            commish_id: None,
            status: Some(status),
        }
    }

    /// Returns true if the draft passes every set criterion.
    pub fn matches(&self, draft: &Draft) -> bool {
        self.commish_id.is_none_or(|id| draft.commish_id == id)
            && self.status.is_none_or(|status| draft.status == status)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::draft::DraftId;

    fn draft(commish: i64, status: DraftStatus) -> Draft {
        Draft {
            id: DraftId(1),
            commish_id: UserId(commish),
            name: "League".to_string(),
            sport: "football".to_string(),
            style: "serpentine".to_string(),
            status,
            rounds: 10,
            password: None,
            using_depth_charts: false,
            create_time: Utc::now(),
            start_time: None,
            end_time: None,
            counter: 0,
            current_pick: 0,
            current_round: 0,
            stats_generated: None,
        }
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = DraftFilter::all();
        assert!(filter.matches(&draft(1, DraftStatus::SettingUp)));
        assert!(filter.matches(&draft(2, DraftStatus::Complete)));
    }

    #[test]
    fn test_commish_filter() {
        let filter = DraftFilter::by_commish(UserId(1));
        assert!(filter.matches(&draft(1, DraftStatus::InProgress)));
        assert!(!filter.matches(&draft(2, DraftStatus::InProgress)));
    }

    #[test]
    fn test_combined_filter_requires_both() {
        let filter = DraftFilter {
            commish_id: Some(UserId(1)),
            status: Some(DraftStatus::Complete),
        };
        assert!(filter.matches(&draft(1, DraftStatus::Complete)));
        assert!(!filter.matches(&draft(1, DraftStatus::SettingUp)));
        assert!(!filter.matches(&draft(2, DraftStatus::Complete)));
    }
}
