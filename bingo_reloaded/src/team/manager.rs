//! Team roster and per-team card assignment.

use std::collections::{BTreeMap, HashMap};

use super::models::{Team, TeamMode};
use crate::{
    card::Card,
    entities::{Participant, PlayerId, TeamColor},
    errors::{SessionError, SessionResult},
    settings::Gamemode,
};

/// Owns every team of a session and the cards they play on.
///
/// Teams are identified by palette colour. A team is active while it has
/// members; emptied teams drop out of the roster and their colour becomes
/// free again.
#[derive(Debug)]
pub struct TeamManager {
    mode: TeamMode,
    max_team_size: usize,
    /// Rostered participants by id
    participants: HashMap<PlayerId, Participant>,
    teams: BTreeMap<TeamColor, Team>,
    /// Card shared by every team in lockout games
    shared_card: Option<Card>,
    /// Set while a game is running; joins are rejected
    locked: bool,
}

impl TeamManager {
    #[must_use]
    pub fn new(mode: TeamMode, max_team_size: usize) -> Self {
        Self {
            mode,
            max_team_size: max_team_size.max(1),
            participants: HashMap::new(),
            teams: BTreeMap::new(),
            shared_card: None,
            locked: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> TeamMode {
        self.mode
    }

    pub fn set_max_team_size(&mut self, max_team_size: usize) {
        self.max_team_size = max_team_size.max(1);
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Adds `participant` to a team.
    ///
    /// In solo mode the requested team is ignored and the participant gets
    /// a colour of their own. In grouped mode an unspecified team means the
    /// smallest team with room, or a fresh colour when all are full.
    pub fn add_member(
        &mut self,
        participant: Participant,
        team: Option<TeamColor>,
    ) -> SessionResult<TeamColor> {
        if self.locked {
            return Err(SessionError::GameInProgress);
        }

        let current = self.team_of(&participant.id);
        let target = match self.mode {
            TeamMode::Solo => match current {
                Some(color) => color,
                None => self.free_color().ok_or(SessionError::NoFreeTeam)?,
            },
            TeamMode::Grouped => match team {
                Some(color) => color,
                None => self.pick_grouped_team(current)?,
            },
        };

        if current == Some(target) {
            return Ok(target);
        }

        if let Some(existing) = self.teams.get(&target)
            && existing.member_count() >= self.max_team_size
        {
            return Err(SessionError::TeamFull {
                team: target,
                max: self.max_team_size,
            });
        }

        self.detach(&participant.id);
        self.teams
            .entry(target)
            .or_insert_with(|| Team::new(target))
            .members
            .insert(participant.id);
        log::debug!("{} joined team {}", participant.display_name, target);
        self.participants.insert(participant.id, participant);

        Ok(target)
    }

    /// Same as [`add_member`](Self::add_member) with the team given by name.
    pub fn add_member_by_name(
        &mut self,
        participant: Participant,
        team_name: &str,
    ) -> SessionResult<TeamColor> {
        let color = team_name
            .parse::<TeamColor>()
            .map_err(|_| SessionError::UnknownTeamTarget(team_name.to_string()))?;
        self.add_member(participant, Some(color))
    }

    /// Removes the participant from whichever team holds them. Returns the
    /// team they left; an emptied team is deactivated.
    pub fn remove_member_from_team(&mut self, player: &PlayerId) -> Option<TeamColor> {
        let left = self.detach(player);
        self.participants.remove(player);
        left
    }

    /// Materializes the team set for a game that is about to start and
    /// locks the roster. Returns the number of active teams.
    pub fn setup(&mut self) -> usize {
        self.teams.retain(|_, team| !team.is_empty());
        self.locked = true;
        log::info!(
            "Starting with {} {} teams and {} participants",
            self.teams.len(),
            self.mode,
            self.participants.len()
        );
        self.teams.len()
    }

    /// Unlocks the roster and takes every card away. Members stay.
    pub fn reset(&mut self) {
        self.locked = false;
        self.clear_cards();
    }

    /// Hands out cards for a new game. Lockout teams share a single card,
    /// every other mode gives each team its own copy.
    pub fn initialize_cards(&mut self, master: &Card, mode: Gamemode) {
        match mode {
            Gamemode::Lockout => {
                self.shared_card = Some(master.fresh_copy());
                for team in self.teams.values_mut() {
                    team.card = None;
                }
            }
            Gamemode::Regular | Gamemode::Complete => {
                self.shared_card = None;
                for team in self.teams.values_mut() {
                    team.card = Some(master.fresh_copy());
                }
            }
        }
    }

    pub fn clear_cards(&mut self) {
        self.shared_card = None;
        for team in self.teams.values_mut() {
            team.card = None;
        }
    }

    /// Card `team` plays on, if it is active and cards were handed out.
    #[must_use]
    pub fn card(&self, team: TeamColor) -> Option<&Card> {
        let team = self.teams.get(&team)?;
        team.card.as_ref().or(self.shared_card.as_ref())
    }

    pub fn card_mut(&mut self, team: TeamColor) -> Option<&mut Card> {
        let team = self.teams.get_mut(&team)?;
        match team.card.as_mut() {
            Some(card) => Some(card),
            None => self.shared_card.as_mut(),
        }
    }

    #[must_use]
    pub fn get_participant_as_member(&self, player: &PlayerId) -> Option<&Participant> {
        self.participants.get(player)
    }

    #[must_use]
    pub fn team_of(&self, player: &PlayerId) -> Option<TeamColor> {
        self.teams
            .values()
            .find(|team| team.contains(player))
            .map(|team| team.color)
    }

    /// Every rostered participant across all teams.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn active_teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    #[must_use]
    pub fn active_team_count(&self) -> usize {
        self.teams.len()
    }

    #[must_use]
    pub fn team(&self, color: TeamColor) -> Option<&Team> {
        self.teams.get(&color)
    }

    fn detach(&mut self, player: &PlayerId) -> Option<TeamColor> {
        let color = self.team_of(player)?;
        if let Some(team) = self.teams.get_mut(&color) {
            team.members.remove(player);
            if team.is_empty() {
                self.teams.remove(&color);
                log::debug!("Team {color} is empty and no longer active");
            }
        }
        Some(color)
    }

    fn free_color(&self) -> Option<TeamColor> {
        TeamColor::ALL
            .into_iter()
            .find(|color| !self.teams.contains_key(color))
    }

    fn pick_grouped_team(&self, current: Option<TeamColor>) -> SessionResult<TeamColor> {
        if let Some(color) = current {
            return Ok(color);
        }
        self.teams
            .values()
            .filter(|team| team.member_count() < self.max_team_size)
            .min_by_key(|team| team.member_count())
            .map(|team| team.color)
            .or_else(|| self.free_color())
            .ok_or(SessionError::NoFreeTeam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardSize, Task};
    use uuid::Uuid;

    fn player(name: &str) -> Participant {
        Participant::new(Uuid::new_v4(), name)
    }

    fn card() -> Card {
        Card::from_tasks(CardSize::X3, vec![Task::filler(); 9]).unwrap()
    }

    #[test]
    fn test_solo_mode_gives_each_player_a_team() {
        let mut manager = TeamManager::new(TeamMode::Solo, 4);
        let alice = manager.add_member(player("alice"), None).unwrap();
        let bob = manager
            .add_member(player("bob"), Some(TeamColor::White))
            .unwrap();

        assert_ne!(alice, bob);
        assert_eq!(manager.active_team_count(), 2);
    }

    #[test]
    fn test_grouped_join_and_switch() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 4);
        let alice = player("alice");
        let id = alice.id;

        manager.add_member(alice.clone(), Some(TeamColor::Red)).unwrap();
        assert_eq!(manager.team_of(&id), Some(TeamColor::Red));

        manager.add_member(alice, Some(TeamColor::Blue)).unwrap();
        assert_eq!(manager.team_of(&id), Some(TeamColor::Blue));
        assert!(manager.team(TeamColor::Red).is_none());
        assert_eq!(manager.participant_count(), 1);
    }

    #[test]
    fn test_unknown_team_name() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 4);
        assert_eq!(
            manager.add_member_by_name(player("alice"), "turquoise"),
            Err(SessionError::UnknownTeamTarget("turquoise".to_string()))
        );
        assert_eq!(manager.participant_count(), 0);
    }

    #[test]
    fn test_full_team_rejects_join() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 1);
        manager.add_member(player("alice"), Some(TeamColor::Red)).unwrap();
        assert_eq!(
            manager.add_member(player("bob"), Some(TeamColor::Red)),
            Err(SessionError::TeamFull {
                team: TeamColor::Red,
                max: 1
            })
        );
    }

    #[test]
    fn test_grouped_auto_assign_fills_smallest_team() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 2);
        manager.add_member(player("a"), Some(TeamColor::Red)).unwrap();
        manager.add_member(player("b"), Some(TeamColor::Red)).unwrap();
        manager.add_member(player("c"), Some(TeamColor::Blue)).unwrap();

        assert_eq!(manager.add_member(player("d"), None), Ok(TeamColor::Blue));
        // Both teams full: a fresh colour is opened.
        assert_eq!(manager.add_member(player("e"), None), Ok(TeamColor::White));
    }

    #[test]
    fn test_removing_last_member_deactivates_team() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 4);
        let alice = player("alice");
        let id = alice.id;
        manager.add_member(alice, Some(TeamColor::Green)).unwrap();

        assert_eq!(manager.remove_member_from_team(&id), Some(TeamColor::Green));
        assert!(manager.active_teams().all(|t| t.color != TeamColor::Green));
        assert!(manager.get_participant_as_member(&id).is_none());
        assert_eq!(manager.remove_member_from_team(&id), None);
    }

    #[test]
    fn test_locked_roster_rejects_join() {
        let mut manager = TeamManager::new(TeamMode::Solo, 4);
        manager.add_member(player("alice"), None).unwrap();
        manager.setup();
        assert_eq!(
            manager.add_member(player("bob"), None),
            Err(SessionError::GameInProgress)
        );
        manager.reset();
        assert!(manager.add_member(player("bob"), None).is_ok());
    }

    #[test]
    fn test_regular_cards_are_independent_copies() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 4);
        manager.add_member(player("a"), Some(TeamColor::Red)).unwrap();
        manager.add_member(player("b"), Some(TeamColor::Blue)).unwrap();
        manager.setup();
        manager.initialize_cards(&card(), Gamemode::Regular);

        manager
            .card_mut(TeamColor::Red)
            .unwrap()
            .complete_item("dirt", 1, TeamColor::Red, Default::default());
        assert_eq!(manager.card(TeamColor::Red).unwrap().completed_total(), 1);
        assert_eq!(manager.card(TeamColor::Blue).unwrap().completed_total(), 0);
    }

    #[test]
    fn test_lockout_teams_share_one_card() {
        let mut manager = TeamManager::new(TeamMode::Grouped, 4);
        manager.add_member(player("a"), Some(TeamColor::Red)).unwrap();
        manager.add_member(player("b"), Some(TeamColor::Blue)).unwrap();
        manager.setup();
        manager.initialize_cards(&card(), Gamemode::Lockout);

        manager
            .card_mut(TeamColor::Red)
            .unwrap()
            .complete_item("dirt", 1, TeamColor::Red, Default::default());
        assert_eq!(manager.card(TeamColor::Blue).unwrap().completed_total(), 1);

        manager.reset();
        assert!(manager.card(TeamColor::Red).is_none());
        assert_eq!(manager.active_team_count(), 2);
    }
}
