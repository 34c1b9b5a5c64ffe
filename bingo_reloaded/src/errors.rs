//! Errors surfaced to the actor that requested an operation.
//!
//! None of these are fatal: the operation is aborted, state is left as it
//! was and the message is shown to the initiating participant.

use thiserror::Error;

use crate::{
    entities::{ArenaName, PlayerId, TeamColor},
    game::PhaseKind,
};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    #[error("can't {action} while the session is in the {phase} phase")]
    InvalidPhaseTransition {
        action: &'static str,
        phase: PhaseKind,
    },
    #[error("could not start bingo since no players have joined")]
    NoParticipants,
    #[error("card '{0}' does not exist")]
    UnknownCardReference(String),
    #[error("team '{0}' does not exist")]
    UnknownTeamTarget(String),
    #[error("you cannot join an ongoing game")]
    GameInProgress,
    #[error("team {team} is full ({max} players)")]
    TeamFull { team: TeamColor, max: usize },
    #[error("every team colour is taken")]
    NoFreeTeam,
    #[error("player {0} is not part of this session")]
    UnknownParticipant(PlayerId),
    #[error("deathmatch already started")]
    DeathmatchAlreadyStarted,
    #[error("invalid {category} vote '{option}'")]
    InvalidVote { category: String, option: String },
    #[error("voting is disabled on this server")]
    VotingDisabled,
    #[error("no death location to return to")]
    RecallUnavailable,
    #[error("session for arena '{0}' does not exist")]
    SessionNotFound(ArenaName),
    #[error("session is closed")]
    SessionClosed,
}

impl SessionError {
    /// Message safe to show to a participant.
    ///
    /// Internal identifiers (player ids) are left out.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            SessionError::UnknownParticipant(_) => "You are not part of this game".to_string(),
            SessionError::SessionNotFound(_) => "There is no bingo game in this world".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Parses a numeric argument, substituting `default` when the input is not
/// a number. Malformed numbers are never reported as errors.
#[must_use]
pub fn to_int<T>(input: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    input.trim().parse().unwrap_or(default)
}
