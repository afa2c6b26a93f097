use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DraftError;

/// Primary key of a draft, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(pub i64);

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user account (commissioners, viewers, admins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted lifecycle state of a draft.
///
/// The view-only `locked` state is not a variant here: it only exists on
/// [`ViewStatus`](super::view::ViewStatus) and can never be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    SettingUp,
    InProgress,
    Complete,
}

impl DraftStatus {
    /// All persisted statuses, in lifecycle order.
    pub const ALL: [DraftStatus; 3] = [
        DraftStatus::SettingUp,
        DraftStatus::InProgress,
        DraftStatus::Complete,
    ];

    /// The value stored in the `draft_status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::SettingUp => "setting_up",
            DraftStatus::InProgress => "in_progress",
            DraftStatus::Complete => "complete",
        }
    }

    /// Human-readable label shown to clients.
    pub fn display_name(&self) -> &'static str {
        match self {
            DraftStatus::SettingUp => "Setting Up",
            DraftStatus::InProgress => "In Progress",
            DraftStatus::Complete => "Completed",
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftStatus {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "setting_up" => Ok(DraftStatus::SettingUp),
            "in_progress" => Ok(DraftStatus::InProgress),
            "complete" => Ok(DraftStatus::Complete),
            other => Err(DraftError::InvalidStatus(other.to_string())),
        }
    }
}

/// A draft as persisted in the `draft` table.
///
/// Built once at the data-access boundary and never mutated afterwards;
/// display fields are derived by [`normalize`](super::operations::normalize).
/// Carries the access password, so it must never be handed to an
/// unauthenticated caller directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: DraftId,
    /// Commissioner (owner) of the draft.
    pub commish_id: UserId,
    pub name: String,
    pub sport: String,
    pub style: String,
    pub status: DraftStatus,
    pub rounds: i64,
    /// Access password; `None` (or empty) means the draft is public.
    pub password: Option<String>,
    pub using_depth_charts: bool,
    pub create_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Number of picks made since the draft started.
    pub counter: i64,
    pub current_pick: i64,
    pub current_round: i64,
    pub stats_generated: Option<DateTime<Utc>>,
}

impl Draft {
    /// Returns true if the draft has a non-empty access password.
    pub fn is_password_protected(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// The editable subset of this draft, as accepted by create and update.
    pub fn settings(&self) -> DraftSettings {
        DraftSettings {
            commish_id: self.commish_id,
            name: self.name.clone(),
            sport: self.sport.clone(),
            style: self.style.clone(),
            rounds: self.rounds,
            password: self.password.clone(),
            using_depth_charts: self.using_depth_charts,
        }
    }
}

/// The fields a commissioner may set when creating or editing a draft.
///
/// Start/end times, pick position, counter and status are deliberately
/// absent: they only change through the lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSettings {
    pub commish_id: UserId,
    pub name: String,
    pub sport: String,
    pub style: String,
    pub rounds: i64,
    pub password: Option<String>,
    pub using_depth_charts: bool,
}

impl DraftSettings {
    /// Creates settings for a public draft without depth charts.
    pub fn new(
        commish_id: UserId,
        name: impl Into<String>,
        sport: impl Into<String>,
        style: impl Into<String>,
        rounds: i64,
    ) -> Self {
        Self {
            commish_id,
            name: name.into(),
            sport: sport.into(),
            style: style.into(),
            rounds,
            password: None,
            using_depth_charts: false,
        }
    }

    /// Protects the draft with an access password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Enables or disables depth charts.
    pub fn with_depth_charts(mut self, enabled: bool) -> Self {
        self.using_depth_charts = enabled;
        self
    }

    /// Transfers the draft to another commissioner.
    pub fn with_commish(mut self, commish_id: UserId) -> Self {
        self.commish_id = commish_id;
        self
    }

    /// Renames the draft.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Changes the number of rounds.
    pub fn with_rounds(mut self, rounds: i64) -> Self {
        self.rounds = rounds;
        self
    }
}

/// The pick a draft moves to after a selection is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPick {
    pub round: i64,
    pub pick: i64,
}

impl NextPick {
    pub fn new(round: i64, pick: i64) -> Self {
        Self { round, pick }
    }
}

/// A configured depth-chart position for a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChartPosition {
    pub id: i64,
    pub draft_id: DraftId,
    pub position: String,
    pub slots: i64,
    pub display_order: i64,
}

/// A depth-chart position to be saved for a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthChartSlot {
    pub position: String,
    pub slots: i64,
}

impl DepthChartSlot {
    pub fn new(position: impl Into<String>, slots: i64) -> Self {
        Self {
            position: position.into(),
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in DraftStatus::ALL {
            assert_eq!(status.as_str().parse::<DraftStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            "IN_PROGRESS".parse::<DraftStatus>().unwrap(),
            DraftStatus::InProgress
        );
    }

    #[test]
    fn test_status_parse_rejects_locked() {
        let err = "locked".parse::<DraftStatus>().unwrap_err();
        assert_eq!(err, DraftError::InvalidStatus("locked".to_string()));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&DraftStatus::SettingUp).unwrap();
        assert_eq!(json, r#""setting_up""#);
    }

    #[test]
    fn test_draft_id_serializes_transparently() {
        assert_eq!(serde_json::to_string(&DraftId(42)).unwrap(), "42");
    }

    #[test]
    fn test_settings_builder() {
        let settings = DraftSettings::new(UserId(1), "League", "football", "serpentine", 12)
            .with_password("secret")
            .with_depth_charts(true);

        assert_eq!(settings.password.as_deref(), Some("secret"));
        assert!(settings.using_depth_charts);
        assert_eq!(settings.rounds, 12);
    }
}
