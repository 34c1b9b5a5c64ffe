//! Host events fed into a session.

use serde::{Deserialize, Serialize};

use crate::entities::{Location, PlayerId};

/// Item names of the kit items every participant carries. Dropping one is
/// never a task completion and the host must cancel it.
pub const KIT_ITEMS: [&str; 4] = ["bingo_card", "bingo_wand", "vote_card", "team_selector"];

#[must_use]
pub fn is_kit_item(item: &str) -> bool {
    KIT_ITEMS.contains(&item)
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    EnteredArena {
        player: PlayerId,
        name: String,
        /// Where the player came from; `None` when they just connected
        from: Option<Location>,
        to: Location,
        /// The player came from another arena that has a session
        #[serde(default)]
        source_is_managed: bool,
    },
    LeftArena {
        player: PlayerId,
        from: Location,
        /// `None` when the player disconnected
        to: Option<Location>,
    },
    DroppedItem {
        player: PlayerId,
        arena: String,
        item: String,
        quantity: u32,
    },
    ReachedMilestone {
        player: PlayerId,
        arena: String,
        milestone: String,
    },
    VoteCast {
        player: PlayerId,
        arena: String,
        category: String,
        option: String,
    },
    ParticipantDied {
        player: PlayerId,
        location: Location,
    },
}

impl SessionEvent {
    /// Arena the event belongs to.
    #[must_use]
    pub fn arena(&self) -> &str {
        match self {
            Self::EnteredArena { to, .. } => &to.world,
            Self::LeftArena { from, .. } => &from.world,
            Self::DroppedItem { arena, .. }
            | Self::ReachedMilestone { arena, .. }
            | Self::VoteCast { arena, .. } => arena,
            Self::ParticipantDied { location, .. } => &location.world,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Self::EnteredArena { player, .. }
            | Self::LeftArena { player, .. }
            | Self::DroppedItem { player, .. }
            | Self::ReachedMilestone { player, .. }
            | Self::VoteCast { player, .. }
            | Self::ParticipantDied { player, .. } => *player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_event_arena() {
        let player = Uuid::new_v4();
        let entered = SessionEvent::EnteredArena {
            player,
            name: "alice".to_string(),
            from: Some(Location::new("hub", 0.0, 0.0, 0.0)),
            to: Location::new("bingo_1", 0.0, 80.0, 0.0),
            source_is_managed: false,
        };
        assert_eq!(entered.arena(), "bingo_1");

        let left = SessionEvent::LeftArena {
            player,
            from: Location::new("bingo_1", 0.0, 80.0, 0.0),
            to: None,
        };
        assert_eq!(left.arena(), "bingo_1");
        assert_eq!(left.player(), player);
    }

    #[test]
    fn test_kit_items() {
        assert!(is_kit_item("bingo_card"));
        assert!(!is_kit_item("diamond"));
    }

    #[test]
    fn test_event_json() {
        let json = r#"{"type":"dropped_item","player":"67e55044-10b1-426f-9247-bb680e5fe0c8",
                       "arena":"bingo_1","item":"apple","quantity":2}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.arena(), "bingo_1");
    }
}
