//! Lobby voting: ballots, the plurality tally and the resulting ticket.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use crate::entities::PlayerId;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteCategory {
    Gamemode,
    Kit,
    Card,
}

impl VoteCategory {
    pub const ALL: [VoteCategory; 3] = [VoteCategory::Gamemode, VoteCategory::Kit, VoteCategory::Card];
}

impl fmt::Display for VoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteCategory::Gamemode => write!(f, "gamemode"),
            VoteCategory::Kit => write!(f, "kit"),
            VoteCategory::Card => write!(f, "card"),
        }
    }
}

impl FromStr for VoteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gamemode" => Ok(VoteCategory::Gamemode),
            "kit" => Ok(VoteCategory::Kit),
            "card" => Ok(VoteCategory::Card),
            _ => Err(format!("unknown vote category '{s}'")),
        }
    }
}

/// Winning option per category. A category nobody voted on stays `None`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VoteTicket {
    pub gamemode: Option<String>,
    pub kit: Option<String>,
    pub card: Option<String>,
}

impl VoteTicket {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gamemode.is_none() && self.kit.is_none() && self.card.is_none()
    }

    #[must_use]
    pub fn get(&self, category: VoteCategory) -> Option<&str> {
        match category {
            VoteCategory::Gamemode => self.gamemode.as_deref(),
            VoteCategory::Kit => self.kit.as_deref(),
            VoteCategory::Card => self.card.as_deref(),
        }
    }

    fn set(&mut self, category: VoteCategory, option: String) {
        match category {
            VoteCategory::Gamemode => self.gamemode = Some(option),
            VoteCategory::Kit => self.kit = Some(option),
            VoteCategory::Card => self.card = Some(option),
        }
    }
}

#[derive(Clone, Debug)]
struct Ballot {
    player: PlayerId,
    category: VoteCategory,
    option: String,
}

/// Ballots cast during one lobby, kept in casting order.
///
/// A player holds at most one ballot per category; voting again withdraws
/// the earlier ballot and appends the new one.
#[derive(Clone, Debug, Default)]
pub struct VoteTally {
    ballots: Vec<Ballot>,
}

impl VoteTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(&mut self, player: PlayerId, category: VoteCategory, option: impl Into<String>) {
        self.ballots
            .retain(|b| !(b.player == player && b.category == category));
        self.ballots.push(Ballot {
            player,
            category,
            option: option.into(),
        });
    }

    /// Withdraws every ballot of `player`.
    pub fn withdraw(&mut self, player: PlayerId) {
        self.ballots.retain(|b| b.player != player);
    }

    pub fn clear(&mut self) {
        self.ballots.clear();
    }

    #[must_use]
    pub fn ballot_count(&self) -> usize {
        self.ballots.len()
    }

    /// Per-category plurality. Ties go to the option whose earliest
    /// surviving ballot was cast first.
    #[must_use]
    pub fn result(&self) -> VoteTicket {
        let mut ticket = VoteTicket::default();
        for category in VoteCategory::ALL {
            // option -> (votes, position of first ballot)
            let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
            for (position, ballot) in self.ballots.iter().enumerate() {
                if ballot.category != category {
                    continue;
                }
                let entry = counts.entry(ballot.option.as_str()).or_insert((0, position));
                entry.0 += 1;
            }

            let winner = counts
                .into_iter()
                .max_by(|(_, (votes_a, first_a)), (_, (votes_b, first_b))| {
                    votes_a.cmp(votes_b).then(first_b.cmp(first_a))
                })
                .map(|(option, _)| option.to_string());

            if let Some(option) = winner {
                ticket.set(category, option);
            }
        }
        ticket
    }
}
