//! Session actor implementation with async message handling.

use super::{
    commands::{Command, CommandReply},
    config::SessionConfig,
    events::SessionEvent,
    lifecycle::Session,
    messages::{SessionMessage, SessionSnapshot},
    player_data::PlayerDataStore,
};
use crate::{
    catalog::Catalog,
    entities::{ArenaName, Participant},
    errors::{SessionError, SessionResult},
    game::{DropOutcome, GameEvent},
    settings::Settings,
};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::{mpsc, oneshot},
    time::{Duration, Instant, interval},
};
use uuid::Uuid;

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    arena: ArenaName,
}

impl SessionHandle {
    pub fn new(sender: mpsc::Sender<SessionMessage>, arena: ArenaName) -> Self {
        Self { sender, arena }
    }

    pub fn arena(&self) -> &str {
        &self.arena
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> SessionResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::SessionClosed)
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> SessionResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(message(tx)).await?;
        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    pub async fn handle_event(&self, event: SessionEvent) -> SessionResult<Option<DropOutcome>> {
        self.request(|response| SessionMessage::Event { event, response })
            .await?
    }

    pub async fn run_command(
        &self,
        participant: Participant,
        command: Command,
    ) -> SessionResult<CommandReply> {
        self.request(|response| SessionMessage::Command {
            participant,
            command,
            response,
        })
        .await?
    }

    pub async fn update_settings(&self, settings: Settings) -> SessionResult<()> {
        self.request(|response| SessionMessage::UpdateSettings { settings, response })
            .await
    }

    pub async fn state(&self) -> SessionResult<SessionSnapshot> {
        self.request(|response| SessionMessage::GetState { response })
            .await
    }

    /// Registers `sender` for every notification the session produces.
    pub async fn subscribe(&self, subscriber: Uuid, sender: mpsc::Sender<GameEvent>) -> SessionResult<()> {
        self.send(SessionMessage::Subscribe { subscriber, sender })
            .await
    }

    pub async fn unsubscribe(&self, subscriber: Uuid) -> SessionResult<()> {
        self.send(SessionMessage::Unsubscribe { subscriber }).await
    }

    pub async fn close(&self) -> SessionResult<()> {
        self.request(|response| SessionMessage::Close { response })
            .await
    }
}

/// Actor owning a single [`Session`]
pub struct SessionActor {
    session: Session,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Subscribers for session notifications
    subscribers: HashMap<Uuid, mpsc::Sender<GameEvent>>,

    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(
        arena: ArenaName,
        config: SessionConfig,
        catalog: Arc<Catalog>,
        player_data: Arc<dyn PlayerDataStore>,
    ) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let session = Session::new(
            arena.clone(),
            config,
            catalog,
            player_data,
            Instant::now().into_std(),
        );

        let actor = Self {
            session,
            inbox,
            subscribers: HashMap::new(),
            is_closed: false,
        };

        let handle = SessionHandle::new(sender, arena);

        (actor, handle)
    }

    /// Run the session actor event loop
    pub async fn run(mut self) {
        log::info!("Session {} starting", self.session.arena());

        let mut tick_interval = interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        // Every handle is gone
                        None => self.close(),
                    }
                }

                _ = tick_interval.tick() => {
                    self.tick();
                }
            }

            self.publish_events();

            if self.is_closed {
                break;
            }
        }

        log::info!("Session {} closed", self.session.arena());
    }

    fn handle_message(&mut self, message: SessionMessage) {
        let now = Instant::now().into_std();

        match message {
            SessionMessage::Event { event, response } => {
                let result = self.session.handle_event(event, now);
                if let Err(e) = &result {
                    log::debug!("Session {}: event rejected: {}", self.session.arena(), e);
                }
                let _ = response.send(result);
            }

            SessionMessage::Command {
                participant,
                command,
                response,
            } => {
                let result = self.session.run_command(&participant, command, now);
                let _ = response.send(result);
            }

            SessionMessage::UpdateSettings { settings, response } => {
                self.session.update_settings(settings);
                let _ = response.send(());
            }

            SessionMessage::GetState { response } => {
                let _ = response.send(self.session.snapshot());
            }

            SessionMessage::Subscribe { subscriber, sender } => {
                self.subscribers.insert(subscriber, sender);
                log::debug!(
                    "Subscriber {} subscribed to session {}",
                    subscriber,
                    self.session.arena()
                );
            }

            SessionMessage::Unsubscribe { subscriber } => {
                self.subscribers.remove(&subscriber);
                log::debug!(
                    "Subscriber {} unsubscribed from session {}",
                    subscriber,
                    self.session.arena()
                );
            }

            SessionMessage::Close { response } => {
                self.close();
                let _ = response.send(());
            }
        }
    }

    fn tick(&mut self) {
        if self.is_closed {
            return;
        }
        self.session.tick(Instant::now().into_std());
    }

    fn close(&mut self) {
        if self.is_closed {
            return;
        }
        self.session.destroy(Instant::now().into_std());
        self.is_closed = true;
    }

    /// Forward drained notifications to all subscribers
    fn publish_events(&mut self) {
        let events = self.session.drain_events();
        if events.is_empty() {
            return;
        }

        for event in &events {
            log::debug!("Session {}: {}", self.session.arena(), event);
        }

        self.subscribers.retain(|subscriber, sender| {
            for event in &events {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        log::warn!("Subscriber {} channel full, dropping notification", subscriber);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        log::debug!("Subscriber {} disconnected, removing", subscriber);
                        return false;
                    }
                }
            }
            true
        });
    }
}
