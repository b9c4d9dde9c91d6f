//! UseCase: Room 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ロールの解決（クライアントが名乗るロールは信用しない）
//! - 参加直後に room-info と doubt-snapshot が届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホスト / 参加者としての参加
//! - 異常系：存在しない Room、二重参加
//! - エッジケース：ホストを名乗る参加者

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DoubtRepository, Identity, MessagePusher, RoomEvent, RoomId, RoomRepository,
    Session,
};

use super::{error::JoinRoomError, room_sync::RoomSyncGate};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    doubts: Arc<dyn DoubtRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Arc<RoomSyncGate>,
}

impl JoinRoomUseCase {
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

    /// Room 参加を実行
    ///
    /// # Arguments
    ///
    /// * `current` - 接続がすでに持っているセッション（あれば二重参加）
    /// * `claimed_role` - クライアントが名乗るロール（ログ用、権限判定には使わない）
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 解決済みロールを持つセッション
    /// * `Err(JoinRoomError)` - 参加失敗（Room が無い場合は room-not-found を送信済み）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        current: Option<&Session>,
        room_id: String,
        claimed_role: Option<&str>,
        identity: String,
    ) -> Result<Session, JoinRoomError> {
        if let Some(session) = current {
            return Err(JoinRoomError::AlreadyJoined(
                session.room_id.as_str().to_string(),
            ));
        }
        let room_id = RoomId::new(room_id)?;
        let identity = Identity::new(identity)?;

        // 存在しない Room のロックは作らない
        if self.rooms.get_room(&room_id).await.is_err() {
            return Err(self.room_not_found(connection_id, room_id, &identity).await);
        }

        // スナップショットと登録の間に差分が入り込まないよう排他
        let guard = self.gate.exclusive(&room_id).await;

        let Ok(room) = self.rooms.get_room(&room_id).await else {
            // 待機中に閉じられた
            drop(guard);
            self.gate.forget(&room_id).await;
            return Err(self.room_not_found(connection_id, room_id, &identity).await);
        };

        let role = room.role_of(&identity);
        if let Some(claimed) = claimed_role
            && !claimed.eq_ignore_ascii_case(if role.is_host() { "host" } else { "participant" })
        {
            tracing::debug!(
                "'{}' claimed role '{}' in room '{}', resolved to {:?}",
                identity.as_str(),
                claimed,
                room_id.as_str(),
                role
            );
        }

        self.message_pusher
            .join_group(&room_id, &connection_id)
            .await
            .map_err(|_| JoinRoomError::ConnectionGone)?;

        let mut doubts = self.doubts.list_by_room(&room_id).await;
        doubts.sort_by_key(|d| d.created_at);

        self.message_pusher
            .push_to(&connection_id, &RoomEvent::RoomInfo { room, role })
            .await
            .map_err(|_| JoinRoomError::ConnectionGone)?;
        self.message_pusher
            .push_to(&connection_id, &RoomEvent::DoubtSnapshot(doubts))
            .await
            .map_err(|_| JoinRoomError::ConnectionGone)?;

        tracing::info!(
            "'{}' joined room '{}' as {:?}",
            identity.as_str(),
            room_id.as_str(),
            role
        );
        Ok(Session {
            connection_id,
            room_id,
            role,
            identity,
        })
    }

    async fn room_not_found(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        identity: &Identity,
    ) -> JoinRoomError {
        let _ = self
            .message_pusher
            .push_to(&connection_id, &RoomEvent::RoomNotFound(room_id.clone()))
            .await;
        tracing::info!(
            "'{}' tried to join missing room '{}'",
            identity.as_str(),
            room_id.as_str()
        );
        JoinRoomError::RoomNotFound(room_id.into_string())
    }
}
