//! Card engine: the N×N grid model, card generation and win detection.
//!
//! This module has no knowledge of sessions or phases. Cards are plain
//! values owned by the team manager while a game is running.

pub mod generator;
pub mod models;

pub use generator::{CardDefinition, PoolSelection, TaskSource, card_rng, generate_card};
pub use models::{Card, CardSize, Completion, FILLER_ITEM, Slot, Task};
