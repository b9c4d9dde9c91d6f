//! UseCase: Doubt 投稿処理
//!
//! 検証 → 永続化 → ブロードキャストの順に処理します。
//! 永続化に失敗した場合は何も配信しません。

use std::sync::Arc;

use undoubt_shared::time::Clock;

use crate::domain::{
    Doubt, DoubtBody, DoubtRepository, MessagePusher, RoomEvent, RoomRepository, Session,
    Timestamp,
};

use super::{
    binding::{acting_identity, bound_room},
    error::RoomEventError,
    room_sync::RoomSyncGate,
};

/// Doubt 投稿のユースケース
pub struct SubmitDoubtUseCase {
    rooms: Arc<dyn RoomRepository>,
    doubts: Arc<dyn DoubtRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Arc<RoomSyncGate>,
    clock: Arc<dyn Clock>,
}

impl SubmitDoubtUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        doubts: Arc<dyn DoubtRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: Arc<RoomSyncGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            doubts,
            message_pusher,
            gate,
            clock,
        }
    }

    /// Doubt 投稿を実行
    ///
    /// 送信者を含む Room の全メンバーに doubt-created が届きます。
    pub async fn execute(
        &self,
        session: &Session,
        room_id: &str,
        body: String,
        submitter: Option<&str>,
    ) -> Result<Doubt, RoomEventError> {
        let room_id = bound_room(session, room_id)?;
        let submitter = acting_identity(session, submitter)?;
        let body = DoubtBody::new(body)?;

        let _guard = self.gate.mutation(&room_id).await;
        self.rooms.get_room(&room_id).await?;

        let created_at = Timestamp::new(self.clock.now_millis());
        let doubt = self
            .doubts
            .create_doubt(room_id.clone(), body, submitter, created_at)
            .await?;

        let delivered = self
            .message_pusher
            .broadcast(&room_id, &RoomEvent::DoubtCreated(doubt.clone()))
            .await;
        tracing::info!(
            "Doubt '{}' submitted in room '{}' by '{}' ({} recipient(s))",
            doubt.id.as_str(),
            room_id.as_str(),
            doubt.submitter.as_str(),
            delivered
        );
        Ok(doubt)
    }
}
