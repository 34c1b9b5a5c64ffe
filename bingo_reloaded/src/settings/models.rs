//! Game settings models.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::card::CardSize;

/// Win condition variants.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gamemode {
    /// Every team plays its own copy of the card; first full line wins.
    #[default]
    Regular,
    /// All teams share one card; a completed slot is lost to the others.
    Lockout,
    /// Every team plays its own copy; the whole card must be filled.
    Complete,
}

impl fmt::Display for Gamemode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gamemode::Regular => write!(f, "regular"),
            Gamemode::Lockout => write!(f, "lockout"),
            Gamemode::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for Gamemode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(Gamemode::Regular),
            "lockout" => Ok(Gamemode::Lockout),
            "complete" => Ok(Gamemode::Complete),
            _ => Err(format!("unknown gamemode '{s}'")),
        }
    }
}

/// Parses a gamemode vote token such as `regular_5` or `lockout_3`.
pub fn parse_gamemode_token(token: &str) -> Result<(Gamemode, CardSize), String> {
    let (mode, size) = token
        .split_once('_')
        .ok_or_else(|| format!("gamemode option '{token}' must look like <mode>_<size>"))?;
    let mode = mode.parse::<Gamemode>()?;
    let size = size
        .parse::<usize>()
        .map_err(|_| format!("invalid card size in '{token}'"))
        .and_then(CardSize::try_from)?;
    Ok((mode, size))
}

/// Starting kit handed to each participant. Item definitions live with the
/// host; the session only carries the choice.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKit {
    Hardcore,
    #[default]
    Normal,
    Overpowered,
    Reloaded,
    Custom(u8),
}

impl fmt::Display for PlayerKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKit::Hardcore => write!(f, "hardcore"),
            PlayerKit::Normal => write!(f, "normal"),
            PlayerKit::Overpowered => write!(f, "overpowered"),
            PlayerKit::Reloaded => write!(f, "reloaded"),
            PlayerKit::Custom(slot) => write!(f, "custom_{slot}"),
        }
    }
}

impl FromStr for PlayerKit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "hardcore" => Ok(PlayerKit::Hardcore),
            "normal" => Ok(PlayerKit::Normal),
            "overpowered" => Ok(PlayerKit::Overpowered),
            "reloaded" => Ok(PlayerKit::Reloaded),
            _ => lower
                .strip_prefix("custom_")
                .and_then(|slot| slot.parse::<u8>().ok())
                .filter(|slot| (1..=5).contains(slot))
                .map(PlayerKit::Custom)
                .ok_or_else(|| format!("unknown kit '{s}'")),
        }
    }
}

/// Effective settings of one game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settings {
    /// Name of the card definition to generate from
    pub card: String,

    pub mode: Gamemode,

    pub size: CardSize,

    pub kit: PlayerKit,

    /// Card generation seed, 0 for a random card
    #[serde(default)]
    pub seed: u64,

    /// Maximum members per team in grouped play
    pub max_team_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            card: "default_card".to_string(),
            mode: Gamemode::Regular,
            size: CardSize::X5,
            kit: PlayerKit::Normal,
            seed: 0,
            max_team_size: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamemode_token() {
        assert_eq!(
            parse_gamemode_token("lockout_3"),
            Ok((Gamemode::Lockout, CardSize::X3))
        );
        assert_eq!(
            parse_gamemode_token("Regular_5"),
            Ok((Gamemode::Regular, CardSize::X5))
        );
        assert!(parse_gamemode_token("regular").is_err());
        assert!(parse_gamemode_token("regular_1").is_err());
        assert!(parse_gamemode_token("speedrun_5").is_err());
        assert!(parse_gamemode_token("regular_100000").is_err());
        assert!(parse_gamemode_token("regular_4294967297").is_err());
        assert!(parse_gamemode_token("lockout_18446744073709551616").is_err());
    }

    #[test]
    fn test_kit_parsing() {
        assert_eq!("hardcore".parse::<PlayerKit>(), Ok(PlayerKit::Hardcore));
        assert_eq!("custom_3".parse::<PlayerKit>(), Ok(PlayerKit::Custom(3)));
        assert!("custom_9".parse::<PlayerKit>().is_err());
        assert!("cheater".parse::<PlayerKit>().is_err());
    }
}
