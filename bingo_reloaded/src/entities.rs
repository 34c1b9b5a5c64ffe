//! Core identities shared by every part of a bingo session.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};
use uuid::Uuid;

/// Stable identity of a player across connections.
pub type PlayerId = Uuid;

/// Arena (world group) name. One session per arena.
pub type ArenaName = String;

/// Time elapsed since the current game started.
pub type GameTime = Duration;

/// Fixed palette of team colours. The palette doubles as the set of
/// team identities a session can ever have.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamColor {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl TeamColor {
    pub const ALL: [TeamColor; 16] = [
        TeamColor::White,
        TeamColor::Orange,
        TeamColor::Magenta,
        TeamColor::LightBlue,
        TeamColor::Yellow,
        TeamColor::Lime,
        TeamColor::Pink,
        TeamColor::Gray,
        TeamColor::LightGray,
        TeamColor::Cyan,
        TeamColor::Purple,
        TeamColor::Blue,
        TeamColor::Brown,
        TeamColor::Green,
        TeamColor::Red,
        TeamColor::Black,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            TeamColor::White => "white",
            TeamColor::Orange => "orange",
            TeamColor::Magenta => "magenta",
            TeamColor::LightBlue => "light_blue",
            TeamColor::Yellow => "yellow",
            TeamColor::Lime => "lime",
            TeamColor::Pink => "pink",
            TeamColor::Gray => "gray",
            TeamColor::LightGray => "light_gray",
            TeamColor::Cyan => "cyan",
            TeamColor::Purple => "purple",
            TeamColor::Blue => "blue",
            TeamColor::Brown => "brown",
            TeamColor::Green => "green",
            TeamColor::Red => "red",
            TeamColor::Black => "black",
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for TeamColor {
    type Err = String;

    /// Accepts `light_blue`, `light blue` and `LightBlue` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        TeamColor::ALL
            .into_iter()
            .find(|color| color.key().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown team '{s}'"))
    }
}

/// A player taking part in a session.
///
/// The display name is captured when the participant is created so it stays
/// available after the underlying connection goes away.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Participant {
    pub id: PlayerId,
    pub display_name: String,
}

impl Participant {
    #[must_use]
    pub fn new(id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A position in some world, as reported by the host platform.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    #[must_use]
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_color_parsing() {
        assert_eq!("light_blue".parse::<TeamColor>(), Ok(TeamColor::LightBlue));
        assert_eq!("Light Blue".parse::<TeamColor>(), Ok(TeamColor::LightBlue));
        assert_eq!("RED".parse::<TeamColor>(), Ok(TeamColor::Red));
        assert!("mauve".parse::<TeamColor>().is_err());
    }

    #[test]
    fn test_team_color_display_round_trips() {
        for color in TeamColor::ALL {
            assert_eq!(color.to_string().parse::<TeamColor>(), Ok(color));
        }
    }
}
