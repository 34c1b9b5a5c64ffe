//! Phase state machine: the data every phase works on and the hooks each
//! phase implements.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashSet, VecDeque},
    fmt,
    sync::Arc,
    time::Instant,
};

use super::{
    deferred::{DeferredAction, DeferredQueue, PhaseEpoch},
    events::{DropOutcome, GameEvent},
    states::{Active, Lobby, PostGame},
};
use crate::{
    catalog::Catalog,
    entities::{ArenaName, Location, PlayerId},
    session::{PlayerDataStore, SessionConfig},
    settings::SettingsBuilder,
    team::TeamManager,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PhaseKind {
    Lobby,
    Active,
    PostGame,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Active => "active",
            Self::PostGame => "postgame",
        };
        write!(f, "{repr}")
    }
}

/// Mutable session data shared across all phases
pub struct SessionData {
    pub(crate) arena: ArenaName,
    pub(crate) config: SessionConfig,
    /// Task pools, card definitions and presets
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) settings: SettingsBuilder,
    pub(crate) teams: TeamManager,
    /// Players currently inside the arena, rostered or not.
    pub(crate) present: HashSet<PlayerId>,
    pub(crate) player_data: Arc<dyn PlayerDataStore>,
    /// Notifications produced since the last drain.
    pub(crate) events: VecDeque<GameEvent>,
    pub(crate) deferred: DeferredQueue,
    /// Epoch of the installed phase.
    pub(crate) epoch: PhaseEpoch,
}

impl SessionData {
    #[must_use]
    pub fn new(
        arena: impl Into<ArenaName>,
        config: SessionConfig,
        catalog: Arc<Catalog>,
        player_data: Arc<dyn PlayerDataStore>,
    ) -> Self {
        let base = catalog.preset(&config.default_settings_preset);
        let teams = TeamManager::new(config.team_mode, base.max_team_size);
        Self {
            arena: arena.into(),
            config,
            catalog,
            settings: SettingsBuilder::new(base),
            teams,
            present: HashSet::new(),
            player_data,
            events: VecDeque::new(),
            deferred: DeferredQueue::new(),
            epoch: PhaseEpoch::default(),
        }
    }

    /// Schedules `action` on behalf of the installed phase.
    pub(crate) fn defer(&mut self, due: Instant, action: DeferredAction) {
        self.deferred.schedule(due, self.epoch, action);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn tell(&mut self, player: PlayerId, text: impl Into<String>) {
        self.events.push_back(GameEvent::Message {
            player: Some(player),
            text: text.into(),
        });
    }
}

impl fmt::Debug for SessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionData")
            .field("arena", &self.arena)
            .field("settings", &self.settings)
            .field("teams", &self.teams)
            .field("present", &self.present.len())
            .field("events", &self.events.len())
            .field("deferred", &self.deferred.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// Setup and teardown hooks of a phase.
#[enum_dispatch]
pub trait PhaseLifecycle {
    fn kind(&self) -> PhaseKind;

    fn setup(&mut self, data: &mut SessionData, now: Instant);

    /// Tears the phase down. Calling it more than once has no further effect.
    fn end(&mut self, data: &mut SessionData, now: Instant);

    fn is_ended(&self) -> bool;
}

/// Participant events whose meaning depends on the phase. Phases that do
/// not care keep the defaults.
#[enum_dispatch]
pub trait PhaseEvents {
    fn handle_dropped_item(
        &mut self,
        _data: &mut SessionData,
        _player: PlayerId,
        _item: &str,
        _quantity: u32,
        _now: Instant,
    ) -> DropOutcome {
        DropOutcome::Ignored
    }

    fn handle_milestone(
        &mut self,
        _data: &mut SessionData,
        _player: PlayerId,
        _milestone: &str,
        _now: Instant,
    ) -> Option<usize> {
        None
    }

    fn handle_death(&mut self, _data: &mut SessionData, _player: PlayerId, _location: Location) {}
}

/// The phase a session is in.
#[enum_dispatch(PhaseLifecycle, PhaseEvents)]
#[derive(Debug)]
pub enum Phase {
    Lobby,
    Active,
    PostGame,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Lobby(Lobby::new())
    }
}
