//! Session phase machine.
//!
//! A session is always in exactly one [`Phase`]:
//!
//! - **Lobby**: participants join teams and vote on the next game
//! - **Active**: a card is in play, completions are tracked, an optional
//!   deathmatch can be triggered
//! - **PostGame**: cooldown before the next lobby opens
//!
//! Every phase implements [`PhaseLifecycle`]. The previous phase's `end`
//! always runs before the next phase's `setup`. Work scheduled for later
//! goes through the [`DeferredQueue`] and is discarded once the phase that
//! scheduled it is gone.

pub mod deferred;
pub mod events;
pub mod state_machine;
pub mod states;

pub use deferred::{DeferredAction, DeferredQueue, PhaseEpoch};
pub use events::{DropOutcome, GameEvent};
pub use state_machine::{Phase, PhaseEvents, PhaseKind, PhaseLifecycle, SessionData};
pub use states::{Active, Deathmatch, GameOutcome, Lobby, PostGame};
