//! Registry spawning and tracking one session actor per arena.

use super::{
    actor::{SessionActor, SessionHandle},
    config::SessionConfig,
    events::SessionEvent,
    player_data::PlayerDataStore,
};
use crate::{
    catalog::Catalog,
    entities::ArenaName,
    errors::{SessionError, SessionResult},
    game::DropOutcome,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Session registry for managing every arena's session
#[derive(Clone)]
pub struct SessionRegistry {
    /// Configuration every new session starts with
    config: SessionConfig,

    catalog: Arc<Catalog>,

    /// Player snapshots, shared by all sessions
    player_data: Arc<dyn PlayerDataStore>,

    /// Active session handles by arena
    sessions: Arc<RwLock<HashMap<ArenaName, SessionHandle>>>,
}

impl SessionRegistry {
    /// Create a new registry. Fails on an invalid configuration.
    pub fn new(
        config: SessionConfig,
        catalog: Arc<Catalog>,
        player_data: Arc<dyn PlayerDataStore>,
    ) -> Result<Self, String> {
        config.validate()?;

        Ok(Self {
            config,
            catalog,
            player_data,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Get the handle of an arena's session
    pub async fn get(&self, arena: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(arena).cloned()
    }

    /// Get the arena's session, spawning it on a miss
    pub async fn get_or_create(&self, arena: &str) -> SessionHandle {
        if let Some(handle) = self.get(arena).await
            && !handle.is_closed()
        {
            return handle;
        }

        let mut sessions = self.sessions.write().await;
        // Another caller may have created it while we waited for the lock.
        if let Some(handle) = sessions.get(arena)
            && !handle.is_closed()
        {
            return handle.clone();
        }

        let (actor, handle) = SessionActor::new(
            arena.to_string(),
            self.config.clone(),
            self.catalog.clone(),
            self.player_data.clone(),
        );
        sessions.insert(arena.to_string(), handle.clone());
        drop(sessions);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created and spawned session for arena {}", arena);

        handle
    }

    /// Route a host event to the session of its arena.
    ///
    /// Entering an arena creates its session. Any other event for an arena
    /// without a session is rejected with `SessionNotFound`.
    pub async fn route(&self, mut event: SessionEvent) -> SessionResult<Option<DropOutcome>> {
        let arena = event.arena().to_string();

        let handle = match &mut event {
            SessionEvent::EnteredArena {
                from,
                source_is_managed,
                ..
            } => {
                if let Some(from) = from
                    && self.get(&from.world).await.is_some()
                {
                    *source_is_managed = true;
                }
                self.get_or_create(&arena).await
            }
            _ => self
                .get(&arena)
                .await
                .ok_or(SessionError::SessionNotFound(arena))?,
        };

        handle.handle_event(event).await
    }

    /// Destroy an arena's session
    pub async fn destroy(&self, arena: &str) -> SessionResult<()> {
        let handle = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(arena)
        }
        .ok_or_else(|| SessionError::SessionNotFound(arena.to_string()))?;

        // An actor that already stopped has nothing left to tear down.
        match handle.close().await {
            Ok(()) | Err(SessionError::SessionClosed) => {}
            Err(e) => return Err(e),
        }

        log::info!("Destroyed session for arena {}", arena);
        Ok(())
    }

    /// Destroy every session
    pub async fn shutdown(&self) {
        for arena in self.arenas().await {
            if let Err(e) = self.destroy(&arena).await {
                log::warn!("Failed to destroy session {}: {}", arena, e);
            }
        }
    }

    /// Arenas with a session, sorted by name
    pub async fn arenas(&self) -> Vec<ArenaName> {
        let sessions = self.sessions.read().await;
        let mut arenas: Vec<ArenaName> = sessions.keys().cloned().collect();
        arenas.sort();
        arenas
    }

    /// Get active session count
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
