//! Team and participant membership.

pub mod manager;
pub mod models;

pub use manager::TeamManager;
pub use models::{Team, TeamMode};
