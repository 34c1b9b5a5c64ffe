//! Session actor message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::{
    commands::{Command, CommandReply},
    events::SessionEvent,
    scoreboard::Scoreboard,
};
use crate::{
    entities::{ArenaName, Participant},
    errors::SessionResult,
    game::{DropOutcome, GameEvent, PhaseKind},
    settings::Settings,
};

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Host event for this arena
    Event {
        event: SessionEvent,
        response: oneshot::Sender<SessionResult<Option<DropOutcome>>>,
    },

    /// Player command
    Command {
        participant: Participant,
        command: Command,
        response: oneshot::Sender<SessionResult<CommandReply>>,
    },

    /// Replace the session settings
    UpdateSettings {
        settings: Settings,
        response: oneshot::Sender<()>,
    },

    /// Get current session state
    GetState {
        response: oneshot::Sender<SessionSnapshot>,
    },

    /// Subscribe to session notifications
    Subscribe {
        subscriber: Uuid,
        sender: mpsc::Sender<GameEvent>,
    },

    /// Unsubscribe from session notifications
    Unsubscribe { subscriber: Uuid },

    /// Destroy the session
    Close { response: oneshot::Sender<()> },
}

/// Session state response
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub arena: ArenaName,

    pub phase: PhaseKind,

    /// Participants on a team
    pub participant_count: usize,

    /// Players inside the arena, rostered or not
    pub present_count: usize,

    /// Session settings, without votes applied
    pub settings: Settings,

    pub scoreboard: Scoreboard,
}
