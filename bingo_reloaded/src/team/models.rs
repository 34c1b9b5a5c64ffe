//! Team models.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{
    card::Card,
    entities::{PlayerId, TeamColor},
};

/// Membership policy, chosen once when the session is created.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamMode {
    /// Every participant plays as a team of one.
    #[default]
    Solo,
    /// Participants pick a shared team.
    Grouped,
}

impl fmt::Display for TeamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamMode::Solo => write!(f, "solo"),
            TeamMode::Grouped => write!(f, "grouped"),
        }
    }
}

impl FromStr for TeamMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solo" => Ok(TeamMode::Solo),
            "grouped" | "team" | "teams" => Ok(TeamMode::Grouped),
            _ => Err(format!("unknown team mode '{s}'")),
        }
    }
}

/// An active team.
#[derive(Clone, Debug)]
pub struct Team {
    pub color: TeamColor,
    pub(crate) members: BTreeSet<PlayerId>,
    /// Assigned while a game is running. Unused in lockout, where all teams
    /// share the manager's card.
    pub(crate) card: Option<Card>,
}

impl Team {
    pub(crate) fn new(color: TeamColor) -> Self {
        Self {
            color,
            members: BTreeSet::new(),
            card: None,
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &PlayerId> {
        self.members.iter()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.members.contains(player)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
