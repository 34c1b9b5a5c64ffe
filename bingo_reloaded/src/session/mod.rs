//! Sessions and the registry that maps arenas to them.
//!
//! This module implements:
//! - Session: the synchronous core owning one arena's phase, teams and cards
//! - SessionActor: async actor driving a session from an mpsc inbox and a timer
//! - SessionRegistry: one session per arena, created on demand
//!
//! ## Example
//!
//! ```no_run
//! use bingo_reloaded::{
//!     Catalog, MemoryPlayerData, SessionConfig, SessionRegistry,
//!     entities::Location, session::SessionEvent,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = SessionRegistry::new(
//!         SessionConfig::default(),
//!         Arc::new(Catalog::builtin()),
//!         Arc::new(MemoryPlayerData::new()),
//!     )
//!     .unwrap();
//!
//!     registry
//!         .route(SessionEvent::EnteredArena {
//!             player: uuid::Uuid::new_v4(),
//!             name: "alice".to_string(),
//!             from: None,
//!             to: Location::new("bingo_1", 0.0, 80.0, 0.0),
//!             source_is_managed: false,
//!         })
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod actor;
pub mod commands;
pub mod config;
pub mod events;
pub mod lifecycle;
pub mod manager;
pub mod messages;
pub mod player_data;
pub mod scoreboard;

pub use actor::{SessionActor, SessionHandle};
pub use commands::{Command, CommandReply};
pub use config::{LoadPlayerInformationStrategy, SessionConfig};
pub use events::{KIT_ITEMS, SessionEvent, is_kit_item};
pub use lifecycle::Session;
pub use manager::SessionRegistry;
pub use messages::{SessionMessage, SessionSnapshot};
pub use player_data::{MemoryPlayerData, PlayerDataStore, PlayerSnapshot};
pub use scoreboard::{Scoreboard, ScoreboardEntry};
