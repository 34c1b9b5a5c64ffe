//! Structured logging configuration.
//!
//! The session library logs through the `log` facade; those records are
//! forwarded into the tracing subscriber installed here.

use bingo_reloaded::GameEvent;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the RUST_LOG env var.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    // `init` also installs the `log` to `tracing` bridge.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a session notification with structured fields
pub fn log_game_event(arena: &str, event: &GameEvent) {
    match event {
        GameEvent::GameEnded { winner, elapsed } => tracing::info!(
            arena = arena,
            winner = ?winner,
            elapsed_secs = elapsed.as_secs(),
            "{event}"
        ),
        GameEvent::Message {
            player: Some(player),
            text,
        } => tracing::info!(arena = arena, player = %player, "to player: {text}"),
        _ => tracing::info!(arena = arena, "{event}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_reloaded::entities::TeamColor;
    use std::time::Duration;

    #[test]
    fn test_log_game_event() {
        // Just ensure it doesn't panic without a subscriber
        log_game_event(
            "bingo_1",
            &GameEvent::GameEnded {
                winner: Some(TeamColor::Red),
                elapsed: Duration::from_secs(90),
            },
        );
        log_game_event(
            "bingo_1",
            &GameEvent::Message {
                player: None,
                text: "A new game can be started in 20s".to_string(),
            },
        );
    }
}
