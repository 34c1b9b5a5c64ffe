use std::time::{Duration, Instant};

use crate::game::{
    deferred::DeferredAction,
    state_machine::{PhaseEvents, PhaseKind, PhaseLifecycle, SessionData},
};

/// Cooldown between the end of a game and the next lobby
#[derive(Debug)]
pub struct PostGame {
    restart_deadline: Instant,
    ended: bool,
}

impl PostGame {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            restart_deadline: now,
            ended: false,
        }
    }

    #[must_use]
    pub fn restart_deadline(&self) -> Instant {
        self.restart_deadline
    }

    /// Time left before the next lobby opens.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.restart_deadline.saturating_duration_since(now)
    }
}

impl PhaseLifecycle for PostGame {
    fn kind(&self) -> PhaseKind {
        PhaseKind::PostGame
    }

    fn setup(&mut self, data: &mut SessionData, now: Instant) {
        let cooldown = data.config.game_restart_time();
        self.restart_deadline = now + cooldown;
        data.defer(self.restart_deadline, DeferredAction::PrepareNextGame);
        data.push_event(crate::game::GameEvent::Message {
            player: None,
            text: format!("A new game can be started in {}s", cooldown.as_secs()),
        });
        log::info!(
            "{}: postgame, next lobby in {}s",
            data.arena,
            cooldown.as_secs()
        );
    }

    fn end(&mut self, _data: &mut SessionData, _now: Instant) {
        self.ended = true;
    }

    fn is_ended(&self) -> bool {
        self.ended
    }
}

impl PhaseEvents for PostGame {}
