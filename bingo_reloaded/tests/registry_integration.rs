/// Integration tests for the session registry and session actors
///
/// These tests route host events through the registry and talk to the
/// spawned actors over their handles.
use std::{sync::Arc, time::Duration};

use bingo_reloaded::{
    Catalog, GameEvent, MemoryPlayerData, PhaseKind, SessionConfig, SessionError, SessionEvent,
    SessionRegistry,
    entities::{Location, Participant, PlayerId},
    session::{Command, CommandReply},
};
use tokio::sync::mpsc;
use uuid::Uuid;

fn registry(config: SessionConfig, store: Arc<MemoryPlayerData>) -> SessionRegistry {
    SessionRegistry::new(config, Arc::new(Catalog::builtin()), store).unwrap()
}

fn enter(player: PlayerId, name: &str, from: Option<&str>, arena: &str) -> SessionEvent {
    SessionEvent::EnteredArena {
        player,
        name: name.to_string(),
        from: from.map(|world| Location::new(world, 0.0, 64.0, 0.0)),
        to: Location::new(arena, 0.0, 80.0, 0.0),
        source_is_managed: false,
    }
}

async fn next_event(rx: &mut mpsc::Receiver<GameEvent>) -> GameEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a notification")
        .expect("session dropped the subscriber")
}

#[tokio::test]
async fn test_entering_creates_session() {
    let registry = registry(SessionConfig::default(), Arc::new(MemoryPlayerData::new()));
    assert_eq!(registry.session_count().await, 0);

    registry
        .route(enter(Uuid::new_v4(), "alice", None, "bingo_1"))
        .await
        .unwrap();

    assert_eq!(registry.arenas().await, vec!["bingo_1".to_string()]);
    let state = registry.get("bingo_1").await.unwrap().state().await.unwrap();
    assert_eq!(state.phase, PhaseKind::Lobby);
    assert_eq!(state.present_count, 1);
    assert_eq!(state.participant_count, 1);
}

#[tokio::test]
async fn test_events_for_unknown_arena_are_rejected() {
    let registry = registry(SessionConfig::default(), Arc::new(MemoryPlayerData::new()));

    let result = registry
        .route(SessionEvent::DroppedItem {
            player: Uuid::new_v4(),
            arena: "nowhere".to_string(),
            item: "apple".to_string(),
            quantity: 1,
        })
        .await;

    assert_eq!(result, Err(SessionError::SessionNotFound("nowhere".to_string())));
    assert_eq!(registry.session_count().await, 0);
}

#[tokio::test]
async fn test_commands_through_handle() {
    let registry = registry(SessionConfig::default(), Arc::new(MemoryPlayerData::new()));
    let alice = Participant::new(Uuid::new_v4(), "alice");
    registry
        .route(enter(alice.id, "alice", None, "bingo_1"))
        .await
        .unwrap();
    let handle = registry.get("bingo_1").await.unwrap();

    let reply = handle
        .run_command(alice.clone(), Command::Start(Some(99)))
        .await
        .unwrap();
    assert_eq!(reply, CommandReply::Done);
    assert_eq!(handle.state().await.unwrap().phase, PhaseKind::Active);

    match handle.run_command(alice, Command::GetCard).await.unwrap() {
        CommandReply::Card(card) => assert_eq!(card.slots().len(), 25),
        other => panic!("expected a card, got {other:?}"),
    }
}

#[tokio::test]
async fn test_subscribers_receive_notifications() {
    let registry = registry(SessionConfig::default(), Arc::new(MemoryPlayerData::new()));
    let handle = registry.get_or_create("bingo_1").await;

    let (tx, mut rx) = mpsc::channel(32);
    handle.subscribe(Uuid::new_v4(), tx).await.unwrap();

    let bob = Uuid::new_v4();
    registry
        .route(enter(bob, "bob", None, "bingo_1"))
        .await
        .unwrap();

    match next_event(&mut rx).await {
        GameEvent::ParticipantJoinedTeam { participant, .. } => assert_eq!(participant.id, bob),
        other => panic!("unexpected notification {other:?}"),
    }
}

#[tokio::test]
async fn test_destroy_closes_session() {
    let registry = registry(SessionConfig::default(), Arc::new(MemoryPlayerData::new()));
    let handle = registry.get_or_create("bingo_1").await;
    let (tx, mut rx) = mpsc::channel(32);
    handle.subscribe(Uuid::new_v4(), tx).await.unwrap();

    registry.destroy("bingo_1").await.unwrap();

    assert_eq!(
        next_event(&mut rx).await,
        GameEvent::SessionDestroyed {
            arena: "bingo_1".to_string()
        }
    );
    assert_eq!(registry.session_count().await, 0);
    assert_eq!(
        registry.destroy("bingo_1").await,
        Err(SessionError::SessionNotFound("bingo_1".to_string()))
    );

    // The actor is gone once it answered the close request
    assert_eq!(handle.state().await.err(), Some(SessionError::SessionClosed));
}

#[tokio::test]
async fn test_player_data_skipped_between_arenas() {
    let store = Arc::new(MemoryPlayerData::new());
    let config = SessionConfig {
        save_player_information: true,
        ..SessionConfig::default()
    };
    let registry = registry(config, store.clone());

    let alice = Uuid::new_v4();
    registry
        .route(enter(alice, "alice", Some("world"), "bingo_1"))
        .await
        .unwrap();
    assert_eq!(store.len(), 1);

    // Coming from a managed arena leaves the snapshot alone
    let bob = Uuid::new_v4();
    registry
        .route(enter(bob, "bob", Some("bingo_1"), "bingo_2"))
        .await
        .unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(registry.session_count().await, 2);
}

#[tokio::test]
async fn test_shutdown_destroys_every_session() {
    let registry = registry(SessionConfig::default(), Arc::new(MemoryPlayerData::new()));
    registry.get_or_create("bingo_1").await;
    registry.get_or_create("bingo_2").await;

    registry.shutdown().await;

    assert_eq!(registry.session_count().await, 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SessionConfig {
        default_settings_preset: String::new(),
        ..SessionConfig::default()
    };
    let result = SessionRegistry::new(
        config,
        Arc::new(Catalog::builtin()),
        Arc::new(MemoryPlayerData::new()),
    );
    assert!(result.is_err());
}
