//! UseCase: Room 作成処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：指定した ID / 自動採番した ID での作成
//! - 異常系：必須項目の欠落、ID の重複
//! - エッジケース：自動採番の衝突時の再試行

use std::sync::Arc;

use undoubt_shared::time::Clock;

use crate::domain::{
    HostContact, Identity, RepositoryError, Room, RoomId, RoomIdFactory, RoomRepository,
    Timestamp, Topic,
};

use super::error::CreateRoomError;

/// Raw input of a room creation request
#[derive(Debug, Clone, Default)]
pub struct CreateRoomInput {
    /// `None` or blank: generate a 5-digit code
    pub room_id: Option<String>,
    pub host_id: String,
    pub host_contact: String,
    pub topic: Option<String>,
}

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    /// 自動採番の最大試行回数
    max_id_attempts: usize,
}

impl CreateRoomUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        max_id_attempts: usize,
    ) -> Self {
        Self {
            rooms,
            clock,
            max_id_attempts: max_id_attempts.max(1),
        }
    }

    /// Room 作成を実行
    ///
    /// 入力はすべて永続化の前に検証されます。
    pub async fn execute(&self, input: CreateRoomInput) -> Result<Room, CreateRoomError> {
        let host = Identity::new(input.host_id)?;
        let host_contact = HostContact::new(input.host_contact)?;
        let topic = Topic::parse(input.topic)?;

        let requested = input.room_id.filter(|id| !id.trim().is_empty());
        match requested {
            Some(id) => {
                let room_id = RoomId::new(id)?;
                self.insert(room_id, host, host_contact, topic)
                    .await
                    .map_err(|e| match e {
                        RepositoryError::RoomAlreadyExists(id) => CreateRoomError::Conflict(id),
                        other => CreateRoomError::Conflict(other.to_string()),
                    })
            }
            None => {
                for attempt in 1..=self.max_id_attempts {
                    let room_id = RoomIdFactory::generate();
                    match self
                        .insert(room_id, host.clone(), host_contact.clone(), topic.clone())
                        .await
                    {
                        Ok(room) => return Ok(room),
                        Err(e) => {
                            tracing::debug!(
                                "Generated room id collided (attempt {}): {}",
                                attempt,
                                e
                            );
                        }
                    }
                }
                Err(CreateRoomError::IdSpaceExhausted(self.max_id_attempts))
            }
        }
    }

    async fn insert(
        &self,
        room_id: RoomId,
        host: Identity,
        host_contact: HostContact,
        topic: Option<Topic>,
    ) -> Result<Room, RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let room = self
            .rooms
            .create_room(room_id, host, host_contact, topic, created_at)
            .await?;
        tracing::info!(
            "Room '{}' created by host '{}'",
            room.id.as_str(),
            room.host.as_str()
        );
        Ok(room)
    }
}
