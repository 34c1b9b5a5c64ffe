//! Notifications produced by a session.

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use super::state_machine::PhaseKind;
use crate::{
    card::Task,
    entities::{ArenaName, GameTime, Location, Participant, PlayerId, TeamColor},
    session::PlayerSnapshot,
    settings::{Settings, VoteCategory},
};

/// Events that occur during a session's lifetime, drained by the owner of
/// the session and forwarded to whatever presents them.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    PhaseChanged {
        from: PhaseKind,
        to: PhaseKind,
    },
    GameEnded {
        winner: Option<TeamColor>,
        elapsed: GameTime,
    },
    SlotCompleted {
        slot: usize,
        task: Task,
        team: TeamColor,
        participant: PlayerId,
        is_bingo: bool,
    },
    SettingsUpdated(Settings),
    ParticipantJoinedTeam {
        participant: Participant,
        team: TeamColor,
    },
    ParticipantLeftTeam {
        participant: Participant,
        team: TeamColor,
    },
    VoteWon {
        category: VoteCategory,
        option: String,
    },
    DeathmatchStarted {
        countdown: Duration,
    },
    DeathmatchTask(Task),
    RecallTeleport {
        player: PlayerId,
        location: Location,
    },
    /// Saved state to put back on a player. `None` means nothing was saved
    /// and the player should be reset instead.
    PlayerDataRestored {
        player: PlayerId,
        snapshot: Option<PlayerSnapshot>,
    },
    SessionDestroyed {
        arena: ArenaName,
    },
    /// Text for one player, or everyone in the arena when `player` is `None`.
    Message {
        player: Option<PlayerId>,
        text: String,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PhaseChanged { from, to } => format!("phase changed from {from} to {to}"),
            Self::GameEnded {
                winner: Some(team),
                elapsed,
            } => format!("team {team} won after {}s", elapsed.as_secs()),
            Self::GameEnded {
                winner: None,
                elapsed,
            } => format!("game ended without a winner after {}s", elapsed.as_secs()),
            Self::SlotCompleted {
                slot,
                task,
                team,
                is_bingo,
                ..
            } => {
                if *is_bingo {
                    format!("team {team} completed {task} (slot {slot}) and got bingo")
                } else {
                    format!("team {team} completed {task} (slot {slot})")
                }
            }
            Self::SettingsUpdated(settings) => format!(
                "settings updated: {} {} on card {}",
                settings.mode, settings.size, settings.card
            ),
            Self::ParticipantJoinedTeam { participant, team } => {
                format!("{participant} joined team {team}")
            }
            Self::ParticipantLeftTeam { participant, team } => {
                format!("{participant} left team {team}")
            }
            Self::VoteWon { category, option } => format!("{option} won the {category} vote"),
            Self::DeathmatchStarted { countdown } => {
                format!("deathmatch starts in {}s", countdown.as_secs())
            }
            Self::DeathmatchTask(task) => format!("first to drop {task} wins"),
            Self::RecallTeleport { player, location } => format!(
                "returning {player} to {} {:.1} {:.1} {:.1}",
                location.world, location.x, location.y, location.z
            ),
            Self::PlayerDataRestored {
                player,
                snapshot: Some(_),
            } => format!("restored saved data of {player}"),
            Self::PlayerDataRestored {
                player,
                snapshot: None,
            } => format!("no saved data for {player}, resetting"),
            Self::SessionDestroyed { arena } => format!("session for {arena} destroyed"),
            Self::Message { text, .. } => text.clone(),
        };
        write!(f, "{repr}")
    }
}

/// What became of a dropped item.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DropOutcome {
    /// Nothing to do with the game; the drop goes through.
    Ignored,
    /// A kit item; the host must cancel the drop.
    Cancelled,
    /// The drop completed `slot` on the dropping team's card.
    Completed { slot: usize },
    /// The drop matched the deathmatch task and decided the game.
    DeathmatchWon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let event = GameEvent::GameEnded {
            winner: Some(TeamColor::Red),
            elapsed: Duration::from_secs(90),
        };
        assert_eq!(event.to_string(), "team red won after 90s");

        let event = GameEvent::PhaseChanged {
            from: PhaseKind::Lobby,
            to: PhaseKind::Active,
        };
        assert_eq!(event.to_string(), "phase changed from lobby to active");
    }
}
