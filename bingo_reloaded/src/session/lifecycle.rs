//! A single bingo session: one arena, one phase at a time.

use std::{sync::Arc, time::Instant};

use super::{
    commands::{Command, CommandReply},
    config::{LoadPlayerInformationStrategy, SessionConfig},
    events::{SessionEvent, is_kit_item},
    messages::SessionSnapshot,
    player_data::{PlayerDataStore, PlayerSnapshot},
    scoreboard::Scoreboard,
};
use crate::{
    card::{Card, card_rng, generate_card},
    catalog::Catalog,
    entities::{Location, Participant, PlayerId, TeamColor},
    errors::{SessionError, SessionResult},
    game::{
        Active, DeferredAction, DropOutcome, GameEvent, Lobby, Phase, PhaseEpoch, PhaseEvents,
        PhaseKind, PhaseLifecycle, PostGame, SessionData,
    },
    settings::{Settings, VoteCategory},
    team::{TeamManager, TeamMode},
};

/// One session of bingo bound to an arena.
///
/// All methods run synchronously and take the current time explicitly;
/// the owner (normally a [`SessionActor`](super::SessionActor)) drives
/// [`tick`](Self::tick) so deferred work fires on time.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    data: SessionData,
}

impl Session {
    /// Creates the session and opens its first lobby.
    pub fn new(
        arena: impl Into<String>,
        config: SessionConfig,
        catalog: Arc<Catalog>,
        player_data: Arc<dyn PlayerDataStore>,
        now: Instant,
    ) -> Self {
        let mut session = Self {
            phase: Phase::default(),
            data: SessionData::new(arena, config, catalog, player_data),
        };
        log::info!(
            "{}: session created with {} teams",
            session.data.arena,
            session.data.config.team_mode
        );
        session.phase.setup(&mut session.data, now);
        session
    }

    #[must_use]
    pub fn arena(&self) -> &str {
        &self.data.arena
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    #[must_use]
    pub fn epoch(&self) -> PhaseEpoch {
        self.data.epoch
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.data.config
    }

    #[must_use]
    pub fn teams(&self) -> &TeamManager {
        &self.data.teams
    }

    /// Session settings, without any vote applied.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.data.settings.view()
    }

    /// Starts a game from the lobby.
    ///
    /// Settings are the session settings, overridden by the lobby vote when
    /// voting is enabled and anyone voted. Nothing changes when this fails.
    pub fn start_game(&mut self, now: Instant) -> SessionResult<()> {
        let Phase::Lobby(lobby) = &self.phase else {
            return Err(self.wrong_phase("start a game"));
        };

        let ticket = lobby.vote_result();
        let voted = self.data.config.use_vote_system && !ticket.is_empty();
        let settings = if voted {
            self.data.settings.vote_result(&ticket).view()
        } else {
            self.data.settings.view()
        };

        let Some(definition) = self.data.catalog.card(&settings.card) else {
            return Err(SessionError::UnknownCardReference(settings.card));
        };

        if self.data.teams.participant_count() == 0 {
            log::warn!(
                "{}: could not start bingo since no players have joined",
                self.data.arena
            );
            return Err(SessionError::NoParticipants);
        }

        let mut rng = card_rng(settings.seed);
        let card = generate_card(settings.size, definition, self.data.catalog.as_ref(), &mut rng);

        if voted {
            for category in VoteCategory::ALL {
                if let Some(option) = ticket.get(category) {
                    self.data.push_event(GameEvent::VoteWon {
                        category,
                        option: option.to_string(),
                    });
                }
            }
        }

        self.transition(Phase::Active(Active::new(settings, card, now)), now);
        self.run_deferred(now);
        Ok(())
    }

    /// Ends a running game without a winner. Does nothing outside a game.
    pub fn end_game(&mut self, now: Instant) {
        if let Phase::Active(active) = &mut self.phase {
            active.end(&mut self.data, now);
        }
        self.run_deferred(now);
    }

    /// Replaces whatever phase is installed with a fresh lobby.
    pub fn prepare_next_game(&mut self, now: Instant) {
        if self.data.config.save_player_information
            && self.data.config.load_player_information_strategy
                == LoadPlayerInformationStrategy::AfterGame
        {
            let mut present: Vec<PlayerId> = self.data.present.iter().copied().collect();
            present.sort();
            for player in present {
                self.restore_player_data(player);
            }
        }

        self.transition(Phase::Lobby(Lobby::new()), now);
    }

    /// Puts `participant` on a team, by name or automatically.
    pub fn join_team(
        &mut self,
        participant: Participant,
        team: Option<&str>,
    ) -> SessionResult<TeamColor> {
        let requested = team
            .map(|name| {
                name.parse::<TeamColor>()
                    .map_err(|_| SessionError::UnknownTeamTarget(name.to_string()))
            })
            .transpose()?;

        let previous = self.data.teams.team_of(&participant.id);
        let color = self.data.teams.add_member(participant.clone(), requested)?;
        if previous != Some(color) {
            if let Some(previous) = previous {
                self.data.push_event(GameEvent::ParticipantLeftTeam {
                    participant: participant.clone(),
                    team: previous,
                });
            }
            self.data.push_event(GameEvent::ParticipantJoinedTeam {
                participant,
                team: color,
            });
        }
        Ok(color)
    }

    /// Takes `player` off their team in any phase. A game that loses its
    /// last participant ends.
    pub fn remove_participant(&mut self, player: &PlayerId, now: Instant) -> Option<TeamColor> {
        let participant = self.data.teams.get_participant_as_member(player).cloned()?;
        let team = self.data.teams.remove_member_from_team(player)?;

        if let Phase::Lobby(lobby) = &mut self.phase {
            lobby.withdraw_votes(*player);
        }
        self.data
            .push_event(GameEvent::ParticipantLeftTeam { participant, team });

        if self.is_running() && self.data.teams.participant_count() == 0 {
            log::info!("{}: every participant left, ending game", self.data.arena);
            self.end_game(now);
        }
        Some(team)
    }

    /// Replaces the session settings layer.
    pub fn update_settings(&mut self, settings: Settings) {
        self.data.teams.set_max_team_size(settings.max_team_size);
        self.data.settings.from_other(settings.clone());
        self.data.push_event(GameEvent::SettingsUpdated(settings));
    }

    pub fn cast_vote(&mut self, player: PlayerId, category: &str, option: &str) -> SessionResult<()> {
        if !self.data.config.use_vote_system {
            return Err(SessionError::VotingDisabled);
        }
        let error = self.wrong_phase("vote");
        let Phase::Lobby(lobby) = &mut self.phase else {
            return Err(error);
        };
        if !self.data.present.contains(&player)
            && self.data.teams.get_participant_as_member(&player).is_none()
        {
            return Err(SessionError::UnknownParticipant(player));
        }

        let category = category
            .parse::<VoteCategory>()
            .map_err(|_| SessionError::InvalidVote {
                category: category.to_string(),
                option: option.to_string(),
            })?;
        lobby.cast_vote(&self.data, player, category, option)
    }

    pub fn start_deathmatch(&mut self, now: Instant) -> SessionResult<()> {
        let error = self.wrong_phase("start a deathmatch");
        let Phase::Active(active) = &mut self.phase else {
            return Err(error);
        };
        active.start_deathmatch(&mut self.data, now)?;
        self.run_deferred(now);
        Ok(())
    }

    /// Sends `player` back to where they last died.
    pub fn back(&mut self, player: PlayerId) -> SessionResult<Location> {
        let error = self.wrong_phase("teleport back");
        let Phase::Active(active) = &mut self.phase else {
            return Err(error);
        };
        if self.data.teams.team_of(&player).is_none() {
            return Err(SessionError::UnknownParticipant(player));
        }
        if !self.data.config.teleport_after_death {
            return Err(SessionError::RecallUnavailable);
        }

        let location = active
            .take_death_location(&player)
            .ok_or(SessionError::RecallUnavailable)?;
        self.data.push_event(GameEvent::RecallTeleport {
            player,
            location: location.clone(),
        });
        Ok(location)
    }

    /// Card the team of `player` plays on.
    #[must_use]
    pub fn card_of(&self, player: &PlayerId) -> Option<&Card> {
        let team = self.data.teams.team_of(player)?;
        self.data.teams.card(team)
    }

    /// Single entry point for host events. Events for other arenas are
    /// ignored. Drops report what the host should do with the item.
    pub fn handle_event(
        &mut self,
        event: SessionEvent,
        now: Instant,
    ) -> SessionResult<Option<DropOutcome>> {
        if event.arena() != self.data.arena {
            log::debug!(
                "{}: ignoring event for arena {}",
                self.data.arena,
                event.arena()
            );
            return Ok(None);
        }

        match event {
            SessionEvent::EnteredArena {
                player,
                name,
                from,
                source_is_managed,
                ..
            } => {
                self.handle_entered_arena(Participant::new(player, name), from, source_is_managed);
                Ok(None)
            }
            SessionEvent::LeftArena { player, to, .. } => {
                self.handle_left_arena(player, to.is_some());
                Ok(None)
            }
            SessionEvent::DroppedItem {
                player,
                item,
                quantity,
                ..
            } => {
                if is_kit_item(&item) {
                    return Ok(Some(DropOutcome::Cancelled));
                }
                let outcome =
                    self.phase
                        .handle_dropped_item(&mut self.data, player, &item, quantity, now);
                self.run_deferred(now);
                Ok(Some(outcome))
            }
            SessionEvent::ReachedMilestone {
                player, milestone, ..
            } => {
                self.phase
                    .handle_milestone(&mut self.data, player, &milestone, now);
                self.run_deferred(now);
                Ok(None)
            }
            SessionEvent::VoteCast {
                player,
                category,
                option,
                ..
            } => {
                self.cast_vote(player, &category, &option)?;
                Ok(None)
            }
            SessionEvent::ParticipantDied { player, location } => {
                self.phase.handle_death(&mut self.data, player, location);
                Ok(None)
            }
        }
    }

    /// Runs a player command.
    pub fn run_command(
        &mut self,
        participant: &Participant,
        command: Command,
        now: Instant,
    ) -> SessionResult<CommandReply> {
        log::debug!("{}: {} ran '{command}'", self.data.arena, participant);
        match command {
            Command::Join(team) => self
                .join_team(participant.clone(), team.as_deref())
                .map(CommandReply::Joined),
            Command::Leave => self
                .remove_participant(&participant.id, now)
                .map(CommandReply::Left)
                .ok_or(SessionError::UnknownParticipant(participant.id)),
            Command::Start(seed) => {
                if let Some(seed) = seed
                    && matches!(self.phase, Phase::Lobby(_))
                {
                    self.data.settings.card_seed(seed);
                }
                self.start_game(now).map(|()| CommandReply::Done)
            }
            Command::End => {
                if !self.is_running() {
                    return Err(self.wrong_phase("end a game"));
                }
                self.end_game(now);
                Ok(CommandReply::Done)
            }
            Command::GetCard => {
                if !self.is_running() {
                    return Err(self.wrong_phase("view the card"));
                }
                self.card_of(&participant.id)
                    .cloned()
                    .map(CommandReply::Card)
                    .ok_or(SessionError::UnknownParticipant(participant.id))
            }
            Command::Back => self.back(participant.id).map(|_| CommandReply::Done),
            Command::Deathmatch => self.start_deathmatch(now).map(|()| CommandReply::Done),
            Command::Vote { category, option } => self
                .cast_vote(participant.id, &category.to_string(), &option)
                .map(|()| CommandReply::Done),
        }
    }

    /// Runs deferred work that has come due.
    pub fn tick(&mut self, now: Instant) {
        self.run_deferred(now);
    }

    /// When the next deferred action is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.data.deferred.next_due()
    }

    /// Takes every notification produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.data.events.drain(..).collect()
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::build(&self.data.teams)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            arena: self.data.arena.clone(),
            phase: self.phase.kind(),
            participant_count: self.data.teams.participant_count(),
            present_count: self.data.present.len(),
            settings: self.settings(),
            scoreboard: self.scoreboard(),
        }
    }

    /// Tears the session down. Pending deferred work is dropped.
    pub fn destroy(&mut self, now: Instant) {
        self.phase.end(&mut self.data, now);
        self.data.deferred.clear();
        self.data.epoch = self.data.epoch.next();
        self.data.push_event(GameEvent::SessionDestroyed {
            arena: self.data.arena.clone(),
        });
        log::info!("{}: session destroyed", self.data.arena);
    }

    fn wrong_phase(&self, action: &'static str) -> SessionError {
        SessionError::InvalidPhaseTransition {
            action,
            phase: self.phase.kind(),
        }
    }

    /// Ends the installed phase, then installs and sets up `next`.
    fn transition(&mut self, next: Phase, now: Instant) {
        let from = self.phase.kind();
        if !self.phase.is_ended() {
            self.phase.end(&mut self.data, now);
        }

        self.data.epoch = self.data.epoch.next();
        self.phase = next;
        let to = self.phase.kind();
        log::info!("{}: {from} -> {to}", self.data.arena);
        self.data.push_event(GameEvent::PhaseChanged { from, to });

        self.phase.setup(&mut self.data, now);
    }

    fn run_deferred(&mut self, now: Instant) {
        loop {
            let due = self.data.deferred.take_due(now);
            if due.is_empty() {
                break;
            }
            for (epoch, action) in due {
                if epoch != self.data.epoch {
                    log::debug!("{}: dropping stale {action:?}", self.data.arena);
                    continue;
                }
                self.run_action(action, now);
            }
        }
    }

    fn run_action(&mut self, action: DeferredAction, now: Instant) {
        match action {
            DeferredAction::EnterPostGame => {
                if self.is_running() {
                    self.transition(Phase::PostGame(PostGame::new(now)), now);
                }
            }
            DeferredAction::PrepareNextGame => {
                if matches!(self.phase, Phase::PostGame(_)) {
                    self.prepare_next_game(now);
                }
            }
            DeferredAction::RevealDeathmatchTask => {
                if let Phase::Active(active) = &mut self.phase {
                    active.reveal_deathmatch_task(&mut self.data);
                }
            }
        }
    }

    fn handle_entered_arena(
        &mut self,
        participant: Participant,
        from: Option<Location>,
        source_is_managed: bool,
    ) {
        let player = participant.id;
        self.data.present.insert(player);
        log::debug!("{}: {participant} entered", self.data.arena);

        // Data is only saved when coming from a world outside any bingo
        // arena. Joining the server straight into the arena has no source.
        if self.data.config.save_player_information && !source_is_managed && from.is_some() {
            self.data
                .player_data
                .save(PlayerSnapshot::new(player, from), false);
        }

        if self.data.config.team_mode == TeamMode::Solo
            && matches!(self.phase, Phase::Lobby(_))
            && self.data.teams.team_of(&player).is_none()
            && let Err(e) = self.join_team(participant, None)
        {
            log::warn!("{}: could not auto-join player {player}: {e}", self.data.arena);
        }
    }

    fn handle_left_arena(&mut self, player: PlayerId, has_destination: bool) {
        self.data.present.remove(&player);

        if self.data.config.save_player_information && has_destination {
            self.restore_player_data(player);
        }

        if self.is_running() && self.data.teams.team_of(&player).is_some() {
            self.data
                .tell(player, "You left the game, come back to keep playing");
        }
    }

    fn restore_player_data(&mut self, player: PlayerId) {
        let snapshot = self.data.player_data.load(&player);
        self.data
            .push_event(GameEvent::PlayerDataRestored { player, snapshot });
    }
}
