//! UseCase: 回答済み切り替え処理
//!
//! ホストのみ実行できます。権限の判定には参加時に解決したロールを使い、
//! ホスト以外からの要求は永続化も配信もせずに破棄します。

use std::sync::Arc;

use crate::domain::{Doubt, DoubtId, DoubtRepository, MessagePusher, RoomEvent, Session};

use super::{
    binding::{bound_room, require_host},
    error::RoomEventError,
    room_sync::RoomSyncGate,
};

/// 回答済み切り替えのユースケース
pub struct ToggleAnsweredUseCase {
    doubts: Arc<dyn DoubtRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Arc<RoomSyncGate>,
}

impl ToggleAnsweredUseCase {
    pub fn new(
        doubts: Arc<dyn DoubtRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: Arc<RoomSyncGate>,
    ) -> Self {
        Self {
            doubts,
            message_pusher,
            gate,
        }
    }

    pub async fn execute(
        &self,
        session: &Session,
        room_id: &str,
        doubt_id: String,
    ) -> Result<Doubt, RoomEventError> {
        let room_id = bound_room(session, room_id)?;
        require_host(session)?;
        let doubt_id = DoubtId::new(doubt_id)?;

        let _guard = self.gate.mutation(&room_id).await;
        // 読み取りと反転はストア内で 1 回の操作として行う
        let doubt = self.doubts.toggle_answered(&room_id, &doubt_id).await?;

        self.message_pusher
            .broadcast(
                &room_id,
                &RoomEvent::AnsweredToggled {
                    doubt_id: doubt.id.clone(),
                    answered: doubt.answered,
                },
            )
            .await;
        tracing::info!(
            "Doubt '{}' in room '{}' marked {}",
            doubt.id.as_str(),
            room_id.as_str(),
            if doubt.answered { "answered" } else { "active" }
        );
        Ok(doubt)
    }
}
