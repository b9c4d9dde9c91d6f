//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを届けるためのインターフェース。
//! Room ごとのブロードキャストグループ（購読者集合）はこの trait の実装が
//! 排他的に所有します。グローバルな可変状態として他のコードから直接
//! 触れられることはありません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RoomEvent, RoomId};

/// 1 接続分の送信キュー（有界）
///
/// キューが溢れた接続は遅いクライアントとして切り離されます。
pub type PusherChannel = mpsc::Sender<String>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録（まだどの Room にも属さない）
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除し、所属するブロードキャストグループからも外す
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 接続を Room のブロードキャストグループに追加
    async fn join_group(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<(), MessagePushError>;

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    /// Room の全メンバーにイベントを送信し、配送できた接続数を返す
    async fn broadcast(&self, room_id: &RoomId, event: &RoomEvent) -> usize;

    /// ブロードキャストグループを解散し、メンバーの送信キューを閉じる
    async fn dissolve_group(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Room に参加中の接続数
    async fn group_size(&self, room_id: &RoomId) -> usize;
}
