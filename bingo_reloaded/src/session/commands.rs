//! Text commands players issue to their session.

use std::{fmt, str::FromStr};

use crate::{card::Card, entities::TeamColor, errors::to_int, settings::VoteCategory};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Join a team, or let the session pick one.
    Join(Option<String>),
    Leave,
    /// Start the game, optionally with a card seed.
    Start(Option<u64>),
    End,
    GetCard,
    Back,
    Deathmatch,
    Vote {
        category: VoteCategory,
        option: String,
    },
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut args = s.split_whitespace();
        let name = args
            .next()
            .ok_or_else(|| "empty command".to_string())?
            .to_lowercase();

        let command = match name.as_str() {
            "join" => Command::Join(args.next().map(str::to_string)),
            "leave" => Command::Leave,
            // A seed that does not parse means a random card.
            "start" => Command::Start(args.next().map(|seed| to_int(seed, 0))),
            "end" => Command::End,
            "getcard" => Command::GetCard,
            "back" => Command::Back,
            "deathmatch" => Command::Deathmatch,
            "vote" => {
                let category = args
                    .next()
                    .ok_or_else(|| "usage: vote <category> <option>".to_string())?
                    .parse::<VoteCategory>()?;
                let option = args
                    .next()
                    .ok_or_else(|| "usage: vote <category> <option>".to_string())?
                    .to_string();
                Command::Vote { category, option }
            }
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Join(Some(team)) => write!(f, "join {team}"),
            Command::Join(None) => write!(f, "join"),
            Command::Leave => write!(f, "leave"),
            Command::Start(Some(seed)) => write!(f, "start {seed}"),
            Command::Start(None) => write!(f, "start"),
            Command::End => write!(f, "end"),
            Command::GetCard => write!(f, "getcard"),
            Command::Back => write!(f, "back"),
            Command::Deathmatch => write!(f, "deathmatch"),
            Command::Vote { category, option } => write!(f, "vote {category} {option}"),
        }
    }
}

/// Successful result of a command.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandReply {
    Done,
    Joined(TeamColor),
    Left(TeamColor),
    Card(Card),
}
