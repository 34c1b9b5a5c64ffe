//! The three session phases.

mod active;
mod lobby;
mod postgame;

pub use active::{Active, Deathmatch, GameOutcome};
pub use lobby::Lobby;
pub use postgame::PostGame;
