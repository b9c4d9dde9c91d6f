//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    HostContact, Identity, RepositoryError, Room, RoomId, RoomRepository, Timestamp, Topic,
};

/// インメモリ Room Registry 実装
///
/// ID の一意性チェックと挿入は同じロックの中で行うため、
/// 同時に同じ ID で作成されても成功するのは 1 件だけです。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// Key: Room ID, Value: Room
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録済み Room 数
    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        room_id: RoomId,
        host: Identity,
        host_contact: HostContact,
        topic: Option<Topic>,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room_id) {
            return Err(RepositoryError::RoomAlreadyExists(room_id.into_string()));
        }

        let room = Room::new(room_id.clone(), host, host_contact, topic, created_at);
        rooms.insert(room_id, room.clone());
        tracing::debug!("Room '{}' created", room.id.as_str());
        Ok(room)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn is_host(&self, room_id: &RoomId, identity: &Identity) -> bool {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .is_some_and(|room| room.is_hosted_by(identity))
    }

    async fn delete_room(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.lock().await;
        if rooms.remove(room_id).is_some() {
            tracing::debug!("Room '{}' deleted", room_id.as_str());
        }
    }
}
