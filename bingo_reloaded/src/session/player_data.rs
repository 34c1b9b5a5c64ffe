//! Saved player state, kept while players are inside a bingo arena.
//!
//! What a snapshot holds beyond the return location (inventory, health,
//! ...) is up to the host; it travels as opaque JSON.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::entities::{Location, PlayerId};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub player: PlayerId,
    /// Where the player came from before entering the arena
    pub location: Option<Location>,
    #[serde(default)]
    pub state: serde_json::Value,
}

impl PlayerSnapshot {
    #[must_use]
    pub fn new(player: PlayerId, location: Option<Location>) -> Self {
        Self {
            player,
            location,
            state: serde_json::Value::Null,
        }
    }
}

/// Storage for player snapshots shared by every session.
pub trait PlayerDataStore: Send + Sync {
    /// Stores a snapshot. An existing snapshot is only replaced when
    /// `overwrite` is set.
    fn save(&self, snapshot: PlayerSnapshot, overwrite: bool);

    /// Takes the snapshot of `player` out of the store.
    fn load(&self, player: &PlayerId) -> Option<PlayerSnapshot>;
}

/// In-memory [`PlayerDataStore`].
#[derive(Debug, Default)]
pub struct MemoryPlayerData {
    snapshots: Mutex<HashMap<PlayerId, PlayerSnapshot>>,
}

impl MemoryPlayerData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlayerDataStore for MemoryPlayerData {
    fn save(&self, snapshot: PlayerSnapshot, overwrite: bool) {
        let mut snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        if overwrite || !snapshots.contains_key(&snapshot.player) {
            snapshots.insert(snapshot.player, snapshot);
        }
    }

    fn load(&self, player: &PlayerId) -> Option<PlayerSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_save_without_overwrite_keeps_first_snapshot() {
        let store = MemoryPlayerData::new();
        let player = Uuid::new_v4();
        let first = PlayerSnapshot::new(player, Some(Location::new("lobby", 0.0, 64.0, 0.0)));
        let second = PlayerSnapshot::new(player, Some(Location::new("nether", 1.0, 70.0, 1.0)));

        store.save(first.clone(), false);
        store.save(second.clone(), false);
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(&player), Some(first));
        assert!(store.is_empty());

        store.save(second.clone(), true);
        assert_eq!(store.load(&player), Some(second));
    }

    #[test]
    fn test_load_unknown_player() {
        let store = MemoryPlayerData::new();
        assert_eq!(store.load(&Uuid::new_v4()), None);
    }
}
