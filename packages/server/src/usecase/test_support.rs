//! Fixtures shared by the use case tests.

use std::sync::Arc;

use tokio::sync::mpsc;
use undoubt_shared::time::FixedClock;

use crate::{
    domain::{
        ConnectionId, DoubtRepository, HostContact, Identity, MessagePusher, Role, Room,
        RoomId, RoomRepository, Session, Timestamp, Topic,
    },
    infrastructure::{
        dto::websocket::ServerMessage,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryDoubtRepository, InMemoryRoomRepository},
    },
};

use super::RoomSyncGate;

pub const ROOM: &str = "12345";
pub const HOST: &str = "host-1";

pub fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub fn identity(value: &str) -> Identity {
    Identity::new(value.to_string()).unwrap()
}

pub struct Fixture {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub doubts: Arc<InMemoryDoubtRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub gate: Arc<RoomSyncGate>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(InMemoryRoomRepository::new()),
            doubts: Arc::new(InMemoryDoubtRepository::new()),
            pusher: Arc::new(WebSocketMessagePusher::new()),
            gate: Arc::new(RoomSyncGate::new()),
            clock: Arc::new(FixedClock::stepping(1_000, 1)),
        }
    }

    /// Fixture with room `ROOM` hosted by `HOST`
    pub async fn with_room() -> Self {
        let fixture = Self::new();
        fixture.create_room(ROOM, HOST).await;
        fixture
    }

    pub async fn create_room(&self, id: &str, host: &str) -> Room {
        self.rooms
            .create_room(
                room_id(id),
                identity(host),
                HostContact::new(format!("{host}@example.com")).unwrap(),
                Topic::parse(Some("Borrow checker".to_string())).unwrap(),
                Timestamp::new(0),
            )
            .await
            .unwrap()
    }

    /// Register a connection in room `id` without going through join
    pub async fn member(
        &self,
        id: &str,
        who: &str,
        role: Role,
    ) -> (Session, mpsc::Receiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(64);
        self.pusher.register_client(connection_id, tx).await;
        self.pusher
            .join_group(&room_id(id), &connection_id)
            .await
            .unwrap();
        let session = Session {
            connection_id,
            room_id: room_id(id),
            role,
            identity: identity(who),
        };
        (session, rx)
    }

    pub async fn seed_doubt(&self, body: &str) -> crate::domain::Doubt {
        self.doubts
            .create_doubt(
                room_id(ROOM),
                crate::domain::DoubtBody::new(body.to_string()).unwrap(),
                identity("alice"),
                Timestamp::new(500),
            )
            .await
            .unwrap()
    }
}

/// Drain and decode everything queued for a connection
pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(json) = rx.try_recv() {
        messages.push(serde_json::from_str(&json).unwrap());
    }
    messages
}
