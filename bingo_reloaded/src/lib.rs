//! # Bingo Reloaded
//!
//! Session engine for a grid-based scavenger-hunt minigame. Players are
//! split into teams, every team races to complete the tasks on an N×N card
//! and the first team to satisfy the game mode's win condition wins.
//!
//! ## Architecture
//!
//! Each arena has exactly one session. A session moves through three phases:
//!
//! - **Lobby**: players join teams and vote on the next game
//! - **Active**: cards are handed out and item drops or milestones complete
//!   slots; a deathmatch may be triggered to force a decision
//! - **PostGame**: a cooldown before the next lobby opens
//!
//! The phases form a finite state machine using `enum_dispatch`. Sessions run
//! as tokio actors owned by a [`SessionRegistry`].
//!
//! ## Core Modules
//!
//! - [`card`]: card model, generation from task pools, win detection
//! - [`team`]: team roster and per-team card assignment
//! - [`settings`]: game settings, presets and lobby voting
//! - [`game`]: phase state machine, notifications, deferred work
//! - [`session`]: session core, actor, registry, commands
//! - [`catalog`]: task pools, card definitions and presets loaded from JSON
//!
//! ## Example
//!
//! ```
//! use bingo_reloaded::{
//!     Catalog, MemoryPlayerData, Session, SessionConfig,
//!     entities::Participant, game::PhaseKind,
//! };
//! use std::{sync::Arc, time::Instant};
//!
//! let now = Instant::now();
//! let mut session = Session::new(
//!     "bingo_1",
//!     SessionConfig::default(),
//!     Arc::new(Catalog::builtin()),
//!     Arc::new(MemoryPlayerData::new()),
//!     now,
//! );
//!
//! session
//!     .join_team(Participant::new(uuid::Uuid::new_v4(), "alice"), None)
//!     .unwrap();
//! session.start_game(now).unwrap();
//! assert_eq!(session.phase_kind(), PhaseKind::Active);
//! ```

/// Card model, generation and win detection.
pub mod card;

/// Task pools, card definitions and settings presets.
pub mod catalog;

pub mod entities;

pub mod errors;

/// Phase state machine.
pub mod game;

/// Sessions, the session actor and the registry.
pub mod session;

pub mod settings;

pub mod team;

pub use catalog::{Catalog, CatalogError};
pub use errors::{SessionError, SessionResult, to_int};
pub use game::{DropOutcome, GameEvent, PhaseKind};
pub use session::{
    MemoryPlayerData, PlayerDataStore, Session, SessionConfig, SessionEvent, SessionHandle,
    SessionRegistry,
};
