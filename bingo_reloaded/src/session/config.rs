//! Session configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::team::TeamMode;

/// When saved player data is put back on players
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPlayerInformationStrategy {
    /// Everyone still in the arena is restored when the next lobby opens.
    AfterGame,
    /// Players are restored as they leave the arena.
    #[default]
    AfterLeavingWorld,
}

impl std::fmt::Display for LoadPlayerInformationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadPlayerInformationStrategy::AfterGame => write!(f, "after_game"),
            LoadPlayerInformationStrategy::AfterLeavingWorld => write!(f, "after_leaving_world"),
        }
    }
}

impl std::str::FromStr for LoadPlayerInformationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "after_game" => Ok(Self::AfterGame),
            "after_leaving_world" => Ok(Self::AfterLeavingWorld),
            _ => Err(format!("unknown load strategy '{s}'")),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Settings preset new sessions start from
    pub default_settings_preset: String,

    /// Whether lobby votes override the session settings
    pub use_vote_system: bool,

    /// Save player state on entering an arena and restore it afterwards
    pub save_player_information: bool,

    pub load_player_information_strategy: LoadPlayerInformationStrategy,

    /// Postgame cooldown in seconds (default: 20)
    pub game_restart_time_secs: u64,

    /// Whether `back` returns players to their death location
    pub teleport_after_death: bool,

    /// Solo or grouped teams, fixed for the session's lifetime
    pub team_mode: TeamMode,

    /// Seconds between triggering a deathmatch and revealing its task
    pub deathmatch_countdown_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_settings_preset: "default".to_string(),
            use_vote_system: true,
            save_player_information: false,
            load_player_information_strategy: LoadPlayerInformationStrategy::AfterLeavingWorld,
            game_restart_time_secs: 20,
            teleport_after_death: true,
            team_mode: TeamMode::Solo,
            deathmatch_countdown_secs: 3,
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_settings_preset.trim().is_empty() {
            return Err("Default settings preset must not be empty".to_string());
        }

        if self.game_restart_time_secs > 3600 {
            return Err("Game restart time must be at most one hour".to_string());
        }

        if self.deathmatch_countdown_secs > 60 {
            return Err("Deathmatch countdown must be at most 60 seconds".to_string());
        }

        Ok(())
    }

    #[must_use]
    pub fn game_restart_time(&self) -> Duration {
        Duration::from_secs(self.game_restart_time_secs)
    }

    #[must_use]
    pub fn deathmatch_countdown(&self) -> Duration {
        Duration::from_secs(self.deathmatch_countdown_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let config = SessionConfig {
            default_settings_preset: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            deathmatch_countdown_secs: 600,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "after_game".parse::<LoadPlayerInformationStrategy>(),
            Ok(LoadPlayerInformationStrategy::AfterGame)
        );
        assert!("never".parse::<LoadPlayerInformationStrategy>().is_err());
    }
}
