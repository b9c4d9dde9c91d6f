//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（有界 `mpsc::Sender`）を管理
//! - Room ごとのブロードキャストグループを管理
//! - イベントを JSON にシリアライズして送信（push_to, broadcast, dissolve_group）
//!
//! ## 設計ノート
//!
//! WebSocket の受付と送信キューの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、メッセージ送信に使用します。
//!
//! sender を保持するのはこの構造体だけです。sender を破棄すると UI 層の
//! 送信ループが終了し、ソケットが閉じられます。キューが溢れた接続
//! （遅いクライアント）はこの仕組みで切り離されます。

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomEvent, RoomId},
    infrastructure::dto::websocket::ServerMessage,
};

#[derive(Default)]
struct PusherState {
    /// Key: connection, Value: 送信キューと所属 Room
    clients: HashMap<ConnectionId, Member>,
    /// Key: Room ID, Value: 購読中の接続
    groups: HashMap<RoomId, HashSet<ConnectionId>>,
}

struct Member {
    sender: PusherChannel,
    room: Option<RoomId>,
}

impl PusherState {
    fn evict(&mut self, connection_id: &ConnectionId) {
        if let Some(member) = self.clients.remove(connection_id)
            && let Some(room) = member.room
            && let Some(group) = self.groups.get_mut(&room)
        {
            group.remove(connection_id);
            if group.is_empty() {
                self.groups.remove(&room);
            }
        }
    }
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// let (tx, rx) = tokio::sync::mpsc::channel(64);
/// pusher.register_client(connection_id, tx).await;
/// pusher.join_group(&room_id, &connection_id).await?;
/// pusher.broadcast(&room_id, &RoomEvent::RoomClosed).await;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    state: Arc<Mutex<PusherState>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &RoomEvent) -> Option<String> {
        match serde_json::to_string(&ServerMessage::from(event)) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Failed to serialize '{}' event: {}", event.kind(), e);
                None
            }
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut state = self.state.lock().await;
        state.clients.insert(connection_id, Member { sender, room: None });
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut state = self.state.lock().await;
        state.evict(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn join_group(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<(), MessagePushError> {
        let mut state = self.state.lock().await;
        let member = state
            .clients
            .get_mut(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        member.room = Some(room_id.clone());
        state
            .groups
            .entry(room_id.clone())
            .or_default()
            .insert(*connection_id);
        tracing::debug!(
            "Connection '{}' joined group '{}'",
            connection_id,
            room_id.as_str()
        );
        Ok(())
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let Some(json) = Self::encode(event) else {
            return Err(MessagePushError::PushFailed("serialization".to_string()));
        };

        let mut state = self.state.lock().await;
        let member = state
            .clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;

        match member.sender.try_send(json) {
            Ok(()) => {
                tracing::debug!("Pushed '{}' to connection '{}'", event.kind(), connection_id);
                Ok(())
            }
            Err(e) => {
                if matches!(e, TrySendError::Full(_)) {
                    tracing::warn!(
                        "Outbound queue of connection '{}' is full, disconnecting",
                        connection_id
                    );
                }
                state.evict(connection_id);
                Err(MessagePushError::PushFailed(e.to_string()))
            }
        }
    }

    async fn broadcast(&self, room_id: &RoomId, event: &RoomEvent) -> usize {
        let Some(json) = Self::encode(event) else {
            return 0;
        };

        let mut state = self.state.lock().await;
        let Some(group) = state.groups.get(room_id) else {
            return 0;
        };

        let mut delivered = 0;
        let mut dropped = Vec::new();
        for connection_id in group {
            let Some(member) = state.clients.get(connection_id) else {
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容し、失敗した接続は切り離す
            match member.sender.try_send(json.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Outbound queue of connection '{}' is full, disconnecting",
                        connection_id
                    );
                    dropped.push(*connection_id);
                }
                Err(TrySendError::Closed(_)) => dropped.push(*connection_id),
            }
        }
        for connection_id in &dropped {
            state.evict(connection_id);
        }

        tracing::debug!(
            "Broadcasted '{}' to {} connection(s) in room '{}'",
            event.kind(),
            delivered,
            room_id.as_str()
        );
        delivered
    }

    async fn dissolve_group(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let mut state = self.state.lock().await;
        let members: Vec<ConnectionId> = state
            .groups
            .remove(room_id)
            .map(|group| group.into_iter().collect())
            .unwrap_or_default();
        // sender を破棄すると送信ループはキューを流し切ってから終了する
        for connection_id in &members {
            state.clients.remove(connection_id);
        }
        tracing::debug!(
            "Dissolved group '{}' ({} connection(s))",
            room_id.as_str(),
            members.len()
        );
        members
    }

    async fn group_size(&self, room_id: &RoomId) -> usize {
        let state = self.state.lock().await;
        state.groups.get(room_id).map_or(0, HashSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: Room のグループ内だけに届くこと
    // - 遅いクライアント（キュー溢れ）の切り離し
    // - dissolve_group: グループ解散後に送信ループが終了できること
    // ========================================

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    async fn connect(
        pusher: &WebSocketMessagePusher,
        room: Option<&RoomId>,
        capacity: usize,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(capacity);
        pusher.register_client(connection_id, tx).await;
        if let Some(room) = room {
            pusher.join_group(room, &connection_id).await.unwrap();
        }
        (connection_id, rx)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (connection_id, mut rx) = connect(&pusher, None, 8).await;

        // when (操作):
        let result = pusher.push_to(&connection_id, &RoomEvent::RoomClosed).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(r#"{"type":"room-closed"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .push_to(&ConnectionId::generate(), &RoomEvent::RoomClosed)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_room_members() {
        // テスト項目: broadcast は同じ Room のグループにだけ届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let room_a = room_id("11111");
        let room_b = room_id("22222");
        let (_a1, mut rx_a1) = connect(&pusher, Some(&room_a), 8).await;
        let (_a2, mut rx_a2) = connect(&pusher, Some(&room_a), 8).await;
        let (_b1, mut rx_b1) = connect(&pusher, Some(&room_b), 8).await;
        let (_idle, mut rx_idle) = connect(&pusher, None, 8).await;

        // when (操作):
        let delivered = pusher.broadcast(&room_a, &RoomEvent::RoomClosed).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert!(rx_a1.try_recv().is_ok());
        assert!(rx_a2.try_recv().is_ok());
        assert!(rx_b1.try_recv().is_err());
        assert!(rx_idle.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_evicts_slow_client() {
        // テスト項目: キューが溢れた接続はグループから外され、送信キューが閉じる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let room = room_id("11111");
        let (_slow, mut rx_slow) = connect(&pusher, Some(&room), 1).await;
        let (_fast, mut rx_fast) = connect(&pusher, Some(&room), 8).await;

        // when (操作):
        let first = pusher.broadcast(&room, &RoomEvent::RoomClosed).await;
        let second = pusher.broadcast(&room, &RoomEvent::RoomClosed).await;

        // then (期待する結果):
        assert_eq!(first, 2);
        assert_eq!(second, 1);
        assert_eq!(pusher.group_size(&room).await, 1);
        assert!(rx_fast.recv().await.is_some());
        assert!(rx_fast.recv().await.is_some());
        // 溢れる前のメッセージは受信でき、その後キューは閉じている
        assert!(rx_slow.recv().await.is_some());
        assert_eq!(rx_slow.recv().await, None);
    }

    #[tokio::test]
    async fn test_unregister_leaves_group() {
        // テスト項目: 登録解除した接続はグループからも外れる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let room = room_id("11111");
        let (connection_id, _rx) = connect(&pusher, Some(&room), 8).await;

        // when (操作):
        pusher.unregister_client(&connection_id).await;

        // then (期待する結果):
        assert_eq!(pusher.group_size(&room).await, 0);
        assert_eq!(pusher.broadcast(&room, &RoomEvent::RoomClosed).await, 0);
    }

    #[tokio::test]
    async fn test_dissolve_group_closes_member_queues() {
        // テスト項目: グループ解散後、キュー済みのメッセージを受信した後にキューが閉じる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let room = room_id("11111");
        let (connection_id, mut rx) = connect(&pusher, Some(&room), 8).await;
        pusher.broadcast(&room, &RoomEvent::RoomClosed).await;

        // when (操作):
        let members = pusher.dissolve_group(&room).await;

        // then (期待する結果):
        assert_eq!(members, vec![connection_id]);
        assert_eq!(rx.recv().await, Some(r#"{"type":"room-closed"}"#.to_string()));
        assert_eq!(rx.recv().await, None);
        assert_eq!(pusher.group_size(&room).await, 0);
    }

    #[tokio::test]
    async fn test_join_group_requires_registration() {
        // テスト項目: 未登録の接続はグループに参加できない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .join_group(&room_id("11111"), &ConnectionId::generate())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }
}
