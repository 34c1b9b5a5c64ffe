//! Settings and vote resolution.
//!
//! [`SettingsBuilder`] merges the default preset with session overrides,
//! and [`VoteTally`] turns lobby ballots into a [`VoteTicket`] that may
//! override both for a single game.

pub mod builder;
pub mod models;
pub mod vote;

pub use builder::SettingsBuilder;
pub use models::{Gamemode, PlayerKit, Settings, parse_gamemode_token};
pub use vote::{VoteCategory, VoteTally, VoteTicket};
