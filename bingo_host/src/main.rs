//! Console host for bingo sessions.
//!
//! Reads host events and player commands from stdin, routes them through a
//! SessionRegistry and logs every notification the sessions emit.

mod config;
mod console;
mod logging;

use std::{path::PathBuf, sync::Arc};

use anyhow::Error;
use bingo_reloaded::{Catalog, GameEvent, MemoryPlayerData, SessionRegistry};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use uuid::Uuid;

use config::HostConfig;
use console::{Console, ConsoleCommand};

const HELP: &str = "\
Run bingo sessions driven from the console

USAGE:
  bingo_host [OPTIONS]

OPTIONS:
  --catalog    PATH        Catalog JSON file          [default: env BINGO_CATALOG or built-in]
  --arenas     A,B,...     Arenas to open on startup  [default: env BINGO_ARENAS]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                         Log filter (e.g., info,bingo_reloaded=debug)
  BINGO_DEFAULT_PRESET             Settings preset for new sessions
  BINGO_USE_VOTES                  Whether lobby votes apply (true/false)
  BINGO_SAVE_PLAYER_INFORMATION    Save player state on entry (true/false)
  BINGO_LOAD_STRATEGY              after_game or after_leaving_world
  BINGO_GAME_RESTART_SECS          Postgame cooldown
  BINGO_TELEPORT_AFTER_DEATH       Whether 'back' is available (true/false)
  BINGO_TEAM_MODE                  solo or grouped
  BINGO_DEATHMATCH_COUNTDOWN_SECS  Deathmatch countdown
";

/// Capacity of each arena's notification channel
const NOTIFICATION_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let catalog_override: Option<PathBuf> = pargs.opt_value_from_str("--catalog")?;
    let arenas_override: Option<String> = pargs.opt_value_from_str("--arenas")?;

    logging::init();

    let config = HostConfig::from_env(catalog_override, arenas_override)?;
    config.validate()?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            Catalog::from_path(path)?
        }
        None => {
            info!("Using built-in catalog");
            Catalog::builtin()
        }
    };
    info!(
        "Catalog has {} pools, {} cards and {} presets",
        catalog.pools.len(),
        catalog.cards.len(),
        catalog.presets.len()
    );

    let registry = SessionRegistry::new(
        config.session.clone(),
        Arc::new(catalog),
        Arc::new(MemoryPlayerData::new()),
    )
    .map_err(|e| anyhow::anyhow!("Invalid session configuration: {}", e))?;

    // Catching signals for exit.
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    set_handler(move || {
        let _ = shutdown_tx.send(true);
    })?;

    for arena in &config.arenas {
        let handle = registry.get_or_create(arena).await;
        spawn_notification_logger(arena.clone(), &handle).await?;
        info!("✓ Opened session for arena {}", arena);
    }

    info!("Host ready. Type 'help' for commands, Ctrl+C to stop.");

    let mut console = Console::new(registry.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = shutdown_rx.changed() => None,
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }

        // New arenas get a logger before their first event is routed.
        if let ConsoleCommand::Enter { arena, .. } = &command
            && registry.get(arena).await.is_none()
        {
            let handle = registry.get_or_create(arena).await;
            spawn_notification_logger(arena.clone(), &handle).await?;
        }

        match console.execute(command).await {
            Ok(output) if !output.is_empty() => println!("{output}"),
            Ok(_) => {}
            Err(e) => println!("error: {e}"),
        }
    }

    info!("Shutting down {} session(s)...", registry.session_count().await);
    registry.shutdown().await;

    Ok(())
}

/// Subscribe to an arena's notifications and log them until it closes
async fn spawn_notification_logger(
    arena: String,
    handle: &bingo_reloaded::SessionHandle,
) -> Result<(), Error> {
    let (tx, mut rx) = mpsc::channel::<GameEvent>(NOTIFICATION_BUFFER);
    handle.subscribe(Uuid::new_v4(), tx).await?;

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            logging::log_game_event(&arena, &event);
            if matches!(event, GameEvent::SessionDestroyed { .. }) {
                break;
            }
        }
    });

    Ok(())
}
