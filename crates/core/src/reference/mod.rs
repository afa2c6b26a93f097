//! Read-only lookup tables attached to a draft view.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::draft::{DepthChartPosition, DraftStatus};

/// Code to display label, ordered by code.
pub type Lookup = BTreeMap<String, String>;

/// Lookup collections for editing a draft, keyed to its sport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLookups {
    pub sports: Lookup,
    pub styles: Lookup,
    pub statuses: Lookup,
    pub teams: Lookup,
    pub historical_teams: Lookup,
    pub positions: Lookup,
    /// Only set for drafts using depth charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_chart_positions: Option<Vec<DepthChartPosition>>,
}

/// Provider of sports, styles, teams and positions.
pub trait ReferenceData: Send + Sync {
    fn sports(&self) -> Lookup;

    fn styles(&self) -> Lookup;

    fn statuses(&self) -> Lookup {
        DraftStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), s.display_name().to_string()))
            .collect()
    }

    fn teams(&self, sport: &str) -> Lookup;

    fn historical_teams(&self, sport: &str) -> Lookup;

    fn positions(&self, sport: &str) -> Lookup;
}

/// Gathers every lookup for `sport`. Depth-chart positions are left unset.
pub fn collect_lookups(reference: &dyn ReferenceData, sport: &str) -> DraftLookups {
    DraftLookups {
        sports: reference.sports(),
        styles: reference.styles(),
        statuses: reference.statuses(),
        teams: reference.teams(sport),
        historical_teams: reference.historical_teams(sport),
        positions: reference.positions(sport),
        depth_chart_positions: None,
    }
}

/// In-process reference tables.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceData {
    sports: Lookup,
    styles: Lookup,
    teams: HashMap<String, Lookup>,
    historical_teams: HashMap<String, Lookup>,
    positions: HashMap<String, Lookup>,
}

fn lookup<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Lookup {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl StaticReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sports and styles supported out of the box, with football positions.
    pub fn standard() -> Self {
        Self::new()
            .with_sport("football", "Football (NFL)")
            .with_sport("baseball", "Baseball (MLB)")
            .with_sport("basketball", "Basketball (NBA)")
            .with_sport("hockey", "Hockey (NHL)")
            .with_style("serpentine", "Serpentine Draft")
            .with_style("standard", "Standard Draft")
            .with_positions(
                "football",
                [
                    ("QB", "Quarterback"),
                    ("RB", "Running Back"),
                    ("WR", "Wide Receiver"),
                    ("TE", "Tight End"),
                    ("K", "Kicker"),
                    ("DEF", "Defense"),
                ],
            )
    }

    pub fn with_sport(mut self, code: &str, name: &str) -> Self {
        self.sports.insert(code.to_string(), name.to_string());
        self
    }

    pub fn with_style(mut self, code: &str, name: &str) -> Self {
        self.styles.insert(code.to_string(), name.to_string());
        self
    }

    pub fn with_teams<'a>(
        mut self,
        sport: &str,
        teams: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.teams.insert(sport.to_string(), lookup(teams));
        self
    }

    pub fn with_historical_teams<'a>(
        mut self,
        sport: &str,
        teams: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.historical_teams.insert(sport.to_string(), lookup(teams));
        self
    }

    pub fn with_positions<'a>(
        mut self,
        sport: &str,
        positions: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.positions.insert(sport.to_string(), lookup(positions));
        self
    }
}

impl ReferenceData for StaticReferenceData {
    fn sports(&self) -> Lookup {
        self.sports.clone()
    }

    fn styles(&self) -> Lookup {
        self.styles.clone()
    }

    fn teams(&self, sport: &str) -> Lookup {
        self.teams.get(sport).cloned().unwrap_or_default()
    }

    fn historical_teams(&self, sport: &str) -> Lookup {
        self.historical_teams.get(sport).cloned().unwrap_or_default()
    }

    fn positions(&self, sport: &str) -> Lookup {
        self.positions.get(sport).cloned().unwrap_or_default()
    }
}
