//! Text console standing in for the game server.
//!
//! Every stdin line is one host event or player command, e.g.
//! `enter bingo_1 alice world` or `cmd bingo_1 alice start 42`.

use bingo_reloaded::{
    SessionEvent, SessionRegistry, to_int,
    entities::{Location, Participant, PlayerId},
    session::{Command, CommandReply},
};
use std::{collections::HashMap, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

pub const HELP: &str = "\
Console commands:
  enter <arena> <player> [from_world]      player enters an arena
  leave <arena> <player> [to_world]        player leaves (no world: disconnect)
  drop <arena> <player> <item> [quantity]  player drops an item
  milestone <arena> <player> <milestone>   player reaches a milestone
  die <arena> <player>                     player dies inside the arena
  vote <arena> <player> <category> <option>
  cmd <arena> <player> <command...>        join, leave, start, end, getcard,
                                           back, deathmatch, vote
  status <arena>                           show phase and scoreboard
  destroy <arena>                          tear the arena's session down
  arenas                                   list arenas with a session
  help | quit";

/// Spawn height used for synthetic locations
const SPAWN_Y: f64 = 80.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown console command '{0}', try 'help'")]
    Unknown(String),

    #[error("{0}")]
    Command(String),
}

/// One parsed console line
#[derive(Clone, Debug, PartialEq)]
pub enum ConsoleCommand {
    Enter {
        arena: String,
        player: String,
        from: Option<String>,
    },
    Leave {
        arena: String,
        player: String,
        to: Option<String>,
    },
    Drop {
        arena: String,
        player: String,
        item: String,
        quantity: u32,
    },
    Milestone {
        arena: String,
        player: String,
        milestone: String,
    },
    Die {
        arena: String,
        player: String,
    },
    Vote {
        arena: String,
        player: String,
        category: String,
        option: String,
    },
    Run {
        arena: String,
        player: String,
        command: Command,
    },
    Status {
        arena: String,
    },
    Destroy {
        arena: String,
    },
    Arenas,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut args = s.split_whitespace();
        let name = args.next().unwrap_or_default().to_lowercase();
        let mut required = |usage: &'static str| {
            args.next()
                .map(str::to_string)
                .ok_or(ConsoleError::Usage(usage))
        };

        let command = match name.as_str() {
            "enter" => {
                let usage = "enter <arena> <player> [from_world]";
                ConsoleCommand::Enter {
                    arena: required(usage)?,
                    player: required(usage)?,
                    from: required(usage).ok(),
                }
            }
            "leave" => {
                let usage = "leave <arena> <player> [to_world]";
                ConsoleCommand::Leave {
                    arena: required(usage)?,
                    player: required(usage)?,
                    to: required(usage).ok(),
                }
            }
            "drop" => {
                let usage = "drop <arena> <player> <item> [quantity]";
                ConsoleCommand::Drop {
                    arena: required(usage)?,
                    player: required(usage)?,
                    item: required(usage)?,
                    quantity: required(usage)
                        .map(|quantity| to_int(&quantity, 1))
                        .unwrap_or(1),
                }
            }
            "milestone" => {
                let usage = "milestone <arena> <player> <milestone>";
                ConsoleCommand::Milestone {
                    arena: required(usage)?,
                    player: required(usage)?,
                    milestone: required(usage)?,
                }
            }
            "die" => {
                let usage = "die <arena> <player>";
                ConsoleCommand::Die {
                    arena: required(usage)?,
                    player: required(usage)?,
                }
            }
            "vote" => {
                let usage = "vote <arena> <player> <category> <option>";
                ConsoleCommand::Vote {
                    arena: required(usage)?,
                    player: required(usage)?,
                    category: required(usage)?,
                    option: required(usage)?,
                }
            }
            "cmd" => {
                let usage = "cmd <arena> <player> <command...>";
                let arena = required(usage)?;
                let player = required(usage)?;
                let rest = args.collect::<Vec<_>>().join(" ");
                let command = rest.parse::<Command>().map_err(ConsoleError::Command)?;
                ConsoleCommand::Run {
                    arena,
                    player,
                    command,
                }
            }
            "status" => ConsoleCommand::Status {
                arena: required("status <arena>")?,
            },
            "destroy" => ConsoleCommand::Destroy {
                arena: required("destroy <arena>")?,
            },
            "arenas" => ConsoleCommand::Arenas,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(ConsoleError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn spawn_of(world: &str) -> Location {
    Location::new(world, 0.0, SPAWN_Y, 0.0)
}

/// Routes console lines into the registry, naming players by display name.
pub struct Console {
    registry: SessionRegistry,
    players: HashMap<String, PlayerId>,
}

impl Console {
    pub fn new(registry: SessionRegistry) -> Self {
        Self {
            registry,
            players: HashMap::new(),
        }
    }

    /// Stable id for a display name, allocated on first use
    pub fn player_id(&mut self, name: &str) -> PlayerId {
        *self
            .players
            .entry(name.to_string())
            .or_insert_with(Uuid::new_v4)
    }

    /// Runs one parsed line and returns what to print
    pub async fn execute(&mut self, command: ConsoleCommand) -> anyhow::Result<String> {
        let output = match command {
            ConsoleCommand::Enter {
                arena,
                player,
                from,
            } => {
                let event = SessionEvent::EnteredArena {
                    player: self.player_id(&player),
                    name: player.clone(),
                    from: from.as_deref().map(spawn_of),
                    to: spawn_of(&arena),
                    source_is_managed: false,
                };
                self.registry.route(event).await?;
                format!("{player} entered {arena}")
            }
            ConsoleCommand::Leave { arena, player, to } => {
                let event = SessionEvent::LeftArena {
                    player: self.player_id(&player),
                    from: spawn_of(&arena),
                    to: to.as_deref().map(spawn_of),
                };
                self.registry.route(event).await?;
                format!("{player} left {arena}")
            }
            ConsoleCommand::Drop {
                arena,
                player,
                item,
                quantity,
            } => {
                let event = SessionEvent::DroppedItem {
                    player: self.player_id(&player),
                    arena,
                    item: item.clone(),
                    quantity,
                };
                match self.registry.route(event).await? {
                    Some(outcome) => format!("drop of {item}: {outcome:?}"),
                    None => format!("drop of {item} ignored"),
                }
            }
            ConsoleCommand::Milestone {
                arena,
                player,
                milestone,
            } => {
                let event = SessionEvent::ReachedMilestone {
                    player: self.player_id(&player),
                    arena,
                    milestone: milestone.clone(),
                };
                self.registry.route(event).await?;
                format!("{player} reached {milestone}")
            }
            ConsoleCommand::Die { arena, player } => {
                let event = SessionEvent::ParticipantDied {
                    player: self.player_id(&player),
                    location: spawn_of(&arena),
                };
                self.registry.route(event).await?;
                format!("{player} died")
            }
            ConsoleCommand::Vote {
                arena,
                player,
                category,
                option,
            } => {
                let event = SessionEvent::VoteCast {
                    player: self.player_id(&player),
                    arena,
                    category,
                    option,
                };
                self.registry.route(event).await?;
                format!("{player} voted")
            }
            ConsoleCommand::Run {
                arena,
                player,
                command,
            } => {
                let handle = self
                    .registry
                    .get(&arena)
                    .await
                    .ok_or_else(|| anyhow::anyhow!("no session in {arena}"))?;
                let participant = Participant::new(self.player_id(&player), player);
                match handle.run_command(participant, command).await {
                    Ok(CommandReply::Done) => "ok".to_string(),
                    Ok(CommandReply::Joined(team)) => format!("joined team {team}"),
                    Ok(CommandReply::Left(team)) => format!("left team {team}"),
                    Ok(CommandReply::Card(card)) => card
                        .slots()
                        .chunks(card.size().side())
                        .map(|row| {
                            row.iter()
                                .map(|slot| {
                                    let mark = if slot.is_complete() { "x" } else { " " };
                                    format!("[{mark}] {}", slot.task)
                                })
                                .collect::<Vec<_>>()
                                .join("  ")
                        })
                        .collect::<Vec<_>>()
                        .join("\n"),
                    Err(e) => e.client_message(),
                }
            }
            ConsoleCommand::Status { arena } => {
                let handle = self
                    .registry
                    .get(&arena)
                    .await
                    .ok_or_else(|| anyhow::anyhow!("no session in {arena}"))?;
                let state = handle.state().await?;
                format!(
                    "{}: {} ({} players, {} on teams, card {} {} {})\n{}",
                    state.arena,
                    state.phase,
                    state.present_count,
                    state.participant_count,
                    state.settings.card,
                    state.settings.mode,
                    state.settings.size,
                    state.scoreboard
                )
            }
            ConsoleCommand::Destroy { arena } => {
                self.registry.destroy(&arena).await?;
                format!("{arena} destroyed")
            }
            ConsoleCommand::Arenas => self.registry.arenas().await.join("\n"),
            ConsoleCommand::Help => HELP.to_string(),
            ConsoleCommand::Quit => String::new(),
        };
        Ok(output)
    }
}
