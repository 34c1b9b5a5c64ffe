//! Scoreboard projection, rebuilt from team state on demand.

use serde::Serialize;
use std::fmt;

use crate::{entities::TeamColor, team::TeamManager};

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScoreboardEntry {
    pub team: TeamColor,
    pub members: Vec<String>,
    /// Slots the team completed on its card; zero outside a game
    pub completed: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Scoreboard {
    pub entries: Vec<ScoreboardEntry>,
}

impl Scoreboard {
    /// Active teams, best score first. Equal scores keep palette order.
    #[must_use]
    pub fn build(teams: &TeamManager) -> Self {
        let mut entries: Vec<ScoreboardEntry> = teams
            .active_teams()
            .map(|team| {
                let mut members: Vec<String> = team
                    .members()
                    .filter_map(|id| teams.get_participant_as_member(id))
                    .map(|p| p.display_name.clone())
                    .collect();
                members.sort();
                ScoreboardEntry {
                    team: team.color,
                    members,
                    completed: teams
                        .card(team.color)
                        .map_or(0, |card| card.complete_count(team.color)),
                }
            })
            .collect();
        entries.sort_by(|a, b| b.completed.cmp(&a.completed));
        Self { entries }
    }

    #[must_use]
    pub fn leader(&self) -> Option<&ScoreboardEntry> {
        self.entries.first()
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{:>12} {:>3}  {}",
                entry.team.key(),
                entry.completed,
                entry.members.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        card::{Card, CardSize, Task},
        entities::Participant,
        settings::Gamemode,
        team::TeamMode,
    };
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn test_scoreboard_orders_by_completed_slots() {
        let mut teams = TeamManager::new(TeamMode::Grouped, 4);
        teams
            .add_member(Participant::new(Uuid::new_v4(), "zed"), Some(TeamColor::Red))
            .unwrap();
        teams
            .add_member(Participant::new(Uuid::new_v4(), "amy"), Some(TeamColor::Red))
            .unwrap();
        teams
            .add_member(Participant::new(Uuid::new_v4(), "bo"), Some(TeamColor::Blue))
            .unwrap();
        teams.setup();

        let card = Card::from_tasks(CardSize::X3, vec![Task::item("apple", 1); 9]).unwrap();
        teams.initialize_cards(&card, Gamemode::Regular);
        teams
            .card_mut(TeamColor::Blue)
            .unwrap()
            .complete_item("apple", 1, TeamColor::Blue, Duration::ZERO);

        let board = Scoreboard::build(&teams);
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.leader().map(|e| e.team), Some(TeamColor::Blue));
        assert_eq!(board.entries[1].members, vec!["amy", "zed"]);
        assert_eq!(board.entries[1].completed, 0);
    }
}
