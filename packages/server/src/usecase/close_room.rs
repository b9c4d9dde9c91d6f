//! UseCase: Room クローズ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ライブ接続（close-room イベント）と HTTP（DELETE）の 2 経路
//! - どちらの経路でも同じ終了状態になること
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホストによるクローズ、全メンバーへの room-closed
//! - 異常系：ホスト以外によるクローズ、存在しない Room
//! - エッジケース：クローズ後に参加しようとする接続

use std::sync::Arc;

use crate::domain::{
    DoubtRepository, Identity, MessagePusher, RoomEvent, RoomId, RoomRepository, Session,
};

use super::{
    binding::{bound_room, require_host},
    error::{CloseRoomError, RoomEventError},
    room_sync::RoomSyncGate,
};

/// Room クローズのユースケース
pub struct CloseRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    doubts: Arc<dyn DoubtRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Arc<RoomSyncGate>,
}

impl CloseRoomUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        doubts: Arc<dyn DoubtRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: Arc<RoomSyncGate>,
    ) -> Self {
        Self {
            rooms,
            doubts,
            message_pusher,
            gate,
        }
    }

    /// ライブ接続からのクローズ（参加時に解決したロールで判定）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - room-closed を受け取ったメンバー数
    pub async fn execute_live(
        &self,
        session: &Session,
        room_id: &str,
    ) -> Result<usize, RoomEventError> {
        let room_id = bound_room(session, room_id)?;
        require_host(session)?;
        self.close(&room_id).await.ok_or_else(|| {
            RoomEventError::NotFound(format!("Room '{}' not found", room_id.as_str()))
        })
    }

    /// HTTP からのクローズ（Room のホスト ID と照合して判定）
    pub async fn execute_http(
        &self,
        room_id: &str,
        identity: Option<String>,
    ) -> Result<usize, CloseRoomError> {
        let room_id = RoomId::new(room_id.to_string())?;
        let room = self
            .rooms
            .get_room(&room_id)
            .await
            .map_err(|_| CloseRoomError::NotFound(room_id.as_str().to_string()))?;

        let identity = Identity::new(identity.unwrap_or_default())
            .map_err(|_| CloseRoomError::Unauthorized)?;
        if !room.is_hosted_by(&identity) {
            return Err(CloseRoomError::Unauthorized);
        }

        self.close(&room_id)
            .await
            .ok_or_else(|| CloseRoomError::NotFound(room_id.into_string()))
    }

    /// 両経路で共通のクローズ処理
    ///
    /// Doubt → Room の順に削除し、room-closed を配信してからグループを解散します。
    /// Room がすでに無い場合は `None`。
    async fn close(&self, room_id: &RoomId) -> Option<usize> {
        let guard = self.gate.exclusive(room_id).await;
        if self.rooms.get_room(room_id).await.is_err() {
            return None;
        }

        self.doubts.delete_all_for_room(room_id).await;
        self.rooms.delete_room(room_id).await;

        let delivered = self
            .message_pusher
            .broadcast(room_id, &RoomEvent::RoomClosed)
            .await;
        self.message_pusher.dissolve_group(room_id).await;

        drop(guard);
        self.gate.forget(room_id).await;

        tracing::info!(
            "Room '{}' closed ({} member(s) notified)",
            room_id.as_str(),
            delivered
        );
        Some(delivered)
    }
}
