//! Host configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bingo_reloaded::{
    SessionConfig,
    session::LoadPlayerInformationStrategy,
    team::TeamMode,
};
use std::path::PathBuf;

/// Complete host configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Catalog JSON file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Configuration every session starts with
    pub session: SessionConfig,
    /// Arenas to open a session for on startup
    pub arenas: Vec<String>,
}

impl HostConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `catalog_override` - Optional catalog path override (from CLI args)
    /// * `arenas_override` - Optional startup arenas override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to a value that cannot be used
    pub fn from_env(
        catalog_override: Option<PathBuf>,
        arenas_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let catalog_path = catalog_override.or_else(|| std::env::var("BINGO_CATALOG").ok().map(PathBuf::from));

        let defaults = SessionConfig::default();

        let load_player_information_strategy = match std::env::var("BINGO_LOAD_STRATEGY") {
            Ok(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                var: "BINGO_LOAD_STRATEGY".to_string(),
                reason,
            })?,
            Err(_) => LoadPlayerInformationStrategy::default(),
        };

        let team_mode = match std::env::var("BINGO_TEAM_MODE") {
            Ok(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                var: "BINGO_TEAM_MODE".to_string(),
                reason,
            })?,
            Err(_) => TeamMode::default(),
        };

        let session = SessionConfig {
            default_settings_preset: std::env::var("BINGO_DEFAULT_PRESET")
                .unwrap_or(defaults.default_settings_preset),
            use_vote_system: parse_env_or("BINGO_USE_VOTES", defaults.use_vote_system),
            save_player_information: parse_env_or(
                "BINGO_SAVE_PLAYER_INFORMATION",
                defaults.save_player_information,
            ),
            load_player_information_strategy,
            game_restart_time_secs: parse_env_or(
                "BINGO_GAME_RESTART_SECS",
                defaults.game_restart_time_secs,
            ),
            teleport_after_death: parse_env_or(
                "BINGO_TELEPORT_AFTER_DEATH",
                defaults.teleport_after_death,
            ),
            team_mode,
            deathmatch_countdown_secs: parse_env_or(
                "BINGO_DEATHMATCH_COUNTDOWN_SECS",
                defaults.deathmatch_countdown_secs,
            ),
        };

        let arenas = arenas_override
            .or_else(|| std::env::var("BINGO_ARENAS").ok())
            .map(|list| parse_arena_list(&list))
            .unwrap_or_default();

        Ok(HostConfig {
            catalog_path,
            session,
            arenas,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "session".to_string(),
                reason,
            })?;

        if let Some(path) = &self.catalog_path
            && !path.is_file()
        {
            return Err(ConfigError::Invalid {
                var: "BINGO_CATALOG".to_string(),
                reason: format!("{} is not a file", path.display()),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Comma separated arena names, blanks and duplicates dropped
fn parse_arena_list(list: &str) -> Vec<String> {
    let mut arenas: Vec<String> = Vec::new();
    for arena in list.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        if !arenas.iter().any(|a| a == arena) {
            arenas.push(arena.to_string());
        }
    }
    arenas
}
