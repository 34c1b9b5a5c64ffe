use rand::seq::IndexedRandom;
use std::{collections::HashMap, time::Instant};

use crate::{
    card::{Card, Task, card_rng},
    entities::{GameTime, Location, PlayerId, TeamColor},
    errors::{SessionError, SessionResult},
    game::{
        deferred::DeferredAction,
        events::{DropOutcome, GameEvent},
        state_machine::{PhaseEvents, PhaseKind, PhaseLifecycle, SessionData},
    },
    settings::{Gamemode, Settings},
    team::TeamManager,
};

/// Result of checking the win condition after a completion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameOutcome {
    Continue,
    Won(TeamColor),
    /// The card ran out with no single leader.
    Draw,
}

/// Deathmatch sub-mode. The task stays hidden until the countdown ends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deathmatch {
    pub task: Option<Task>,
}

/// Active state - a card is in play
#[derive(Debug)]
pub struct Active {
    settings: Settings,
    /// Card the teams' cards were copied from
    card: Card,
    started_at: Instant,
    /// Teams playing when the game started, used by the lockout threshold
    team_count: usize,
    deathmatch: Option<Deathmatch>,
    /// Last death location per participant, for `back`
    death_locations: HashMap<PlayerId, Location>,
    winner: Option<TeamColor>,
    ended: bool,
}

impl Active {
    #[must_use]
    pub fn new(settings: Settings, card: Card, now: Instant) -> Self {
        Self {
            settings,
            card,
            started_at: now,
            team_count: 0,
            deathmatch: None,
            death_locations: HashMap::new(),
            winner: None,
            ended: false,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn card(&self) -> &Card {
        &self.card
    }

    #[must_use]
    pub fn elapsed(&self, now: Instant) -> GameTime {
        now.saturating_duration_since(self.started_at)
    }

    #[must_use]
    pub fn deathmatch(&self) -> Option<&Deathmatch> {
        self.deathmatch.as_ref()
    }

    #[must_use]
    pub fn winner(&self) -> Option<TeamColor> {
        self.winner
    }

    /// Switches the game into deathmatch. The task is revealed once the
    /// configured countdown has passed.
    pub fn start_deathmatch(&mut self, data: &mut SessionData, now: Instant) -> SessionResult<()> {
        if self.deathmatch.is_some() {
            return Err(SessionError::DeathmatchAlreadyStarted);
        }

        let countdown = data.config.deathmatch_countdown();
        self.deathmatch = Some(Deathmatch::default());
        data.push_event(GameEvent::DeathmatchStarted { countdown });
        data.defer(now + countdown, DeferredAction::RevealDeathmatchTask);
        log::info!("{}: deathmatch starting in {}s", data.arena, countdown.as_secs());
        Ok(())
    }

    /// Picks the deathmatch task among the card's item tasks.
    pub fn reveal_deathmatch_task(&mut self, data: &mut SessionData) {
        if self.ended {
            return;
        }
        let Some(deathmatch) = self.deathmatch.as_mut() else {
            return;
        };
        if deathmatch.task.is_some() {
            return;
        }

        let candidates: Vec<&Task> = self
            .card
            .slots()
            .iter()
            .map(|slot| &slot.task)
            .filter(|task| matches!(task, Task::Item { .. }))
            .collect();
        let mut rng = card_rng(self.settings.seed);
        let task = candidates
            .choose(&mut rng)
            .map(|task| (*task).clone())
            .unwrap_or_else(Task::filler);

        log::info!("{}: deathmatch task is {task}", data.arena);
        deathmatch.task = Some(task.clone());
        data.push_event(GameEvent::DeathmatchTask(task));
    }

    /// Where `player` last died, consumed by the call.
    pub fn take_death_location(&mut self, player: &PlayerId) -> Option<Location> {
        self.death_locations.remove(player)
    }

    /// Ends the game with `winner`.
    pub fn finish(&mut self, data: &mut SessionData, winner: Option<TeamColor>, now: Instant) {
        if self.ended {
            return;
        }
        self.winner = winner;
        self.end(data, now);
    }

    /// Win condition of the game mode, evaluated for `team` right after it
    /// completed a slot.
    #[must_use]
    pub fn outcome_for(&self, teams: &TeamManager, team: TeamColor) -> GameOutcome {
        let Some(card) = teams.card(team) else {
            return GameOutcome::Continue;
        };
        let full = card.size().full_size();

        match self.settings.mode {
            Gamemode::Regular => {
                if card.has_bingo(team) {
                    GameOutcome::Won(team)
                } else {
                    GameOutcome::Continue
                }
            }
            Gamemode::Complete => {
                if card.complete_count(team) == full {
                    GameOutcome::Won(team)
                } else {
                    GameOutcome::Continue
                }
            }
            Gamemode::Lockout => {
                let threshold = full / self.team_count.max(1) + 1;
                if card.complete_count(team) >= threshold {
                    return GameOutcome::Won(team);
                }
                if !card.is_exhausted() {
                    return GameOutcome::Continue;
                }
                lockout_leader(card, teams)
            }
        }
    }

    fn complete_slot(
        &mut self,
        data: &mut SessionData,
        player: PlayerId,
        now: Instant,
        complete: impl FnOnce(&mut Card, TeamColor, GameTime) -> Option<usize>,
    ) -> Option<usize> {
        if self.ended {
            return None;
        }
        let team = data.teams.team_of(&player)?;
        let elapsed = self.elapsed(now);

        let card = data.teams.card_mut(team)?;
        let slot = complete(card, team, elapsed)?;
        let task = card.slot(slot)?.task.clone();

        let outcome = self.outcome_for(&data.teams, team);
        log::info!("{}: team {team} completed {task} in slot {slot}", data.arena);
        data.push_event(GameEvent::SlotCompleted {
            slot,
            task,
            team,
            participant: player,
            is_bingo: outcome == GameOutcome::Won(team),
        });

        match outcome {
            GameOutcome::Continue => {}
            GameOutcome::Won(winner) => self.finish(data, Some(winner), now),
            GameOutcome::Draw => self.finish(data, None, now),
        }
        Some(slot)
    }
}

/// Team with strictly the most slots on a lockout card.
fn lockout_leader(card: &Card, teams: &TeamManager) -> GameOutcome {
    let mut counts: Vec<(TeamColor, usize)> = teams
        .active_teams()
        .map(|team| (team.color, card.complete_count(team.color)))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    match counts.as_slice() {
        [(leader, best), (_, second), ..] if best > second => GameOutcome::Won(*leader),
        [(leader, _)] => GameOutcome::Won(*leader),
        _ => GameOutcome::Draw,
    }
}

impl PhaseLifecycle for Active {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Active
    }

    fn setup(&mut self, data: &mut SessionData, now: Instant) {
        self.started_at = now;
        self.team_count = data.teams.setup();
        data.teams.initialize_cards(&self.card, self.settings.mode);
        log::info!(
            "{}: {} game started on card '{}' ({}, kit {})",
            data.arena,
            self.settings.mode,
            self.settings.card,
            self.settings.size,
            self.settings.kit
        );
    }

    fn end(&mut self, data: &mut SessionData, now: Instant) {
        if self.ended {
            return;
        }
        self.ended = true;

        let elapsed = self.elapsed(now);
        match self.winner {
            Some(team) => log::info!("{}: team {team} won after {:?}", data.arena, elapsed),
            None => log::info!("{}: game ended without a winner", data.arena),
        }
        data.push_event(GameEvent::GameEnded {
            winner: self.winner,
            elapsed,
        });
        data.defer(now, DeferredAction::EnterPostGame);
    }

    fn is_ended(&self) -> bool {
        self.ended
    }
}

impl PhaseEvents for Active {
    fn handle_dropped_item(
        &mut self,
        data: &mut SessionData,
        player: PlayerId,
        item: &str,
        quantity: u32,
        now: Instant,
    ) -> DropOutcome {
        if self.ended {
            return DropOutcome::Ignored;
        }

        // Only the deathmatch task counts once a deathmatch is running.
        if let Some(deathmatch) = &self.deathmatch {
            let won = deathmatch
                .task
                .as_ref()
                .is_some_and(|task| task.matches_item(item, quantity));
            let team = data.teams.team_of(&player);
            return match team {
                Some(team) if won => {
                    self.finish(data, Some(team), now);
                    DropOutcome::DeathmatchWon
                }
                _ => DropOutcome::Ignored,
            };
        }

        match self.complete_slot(data, player, now, |card, team, at| {
            card.complete_item(item, quantity, team, at)
        }) {
            Some(slot) => DropOutcome::Completed { slot },
            None => DropOutcome::Ignored,
        }
    }

    fn handle_milestone(
        &mut self,
        data: &mut SessionData,
        player: PlayerId,
        milestone: &str,
        now: Instant,
    ) -> Option<usize> {
        if self.deathmatch.is_some() {
            return None;
        }
        self.complete_slot(data, player, now, |card, team, at| {
            card.complete_milestone(milestone, team, at)
        })
    }

    fn handle_death(&mut self, data: &mut SessionData, player: PlayerId, location: Location) {
        if self.ended || data.teams.team_of(&player).is_none() {
            return;
        }
        self.death_locations.insert(player, location);
        if data.config.teleport_after_death {
            data.tell(player, "Use 'back' to return to where you died");
        }
    }
}
