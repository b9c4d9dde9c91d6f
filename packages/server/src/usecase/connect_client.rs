//! UseCase: 接続処理
//!
//! WebSocket 接続の送信キューを MessagePusher に登録します。
//! この時点ではどの Room にも属していません（`join-room` で参加）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続のユースケース
pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 新しい接続 ID を払い出し、送信キューを登録
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        tracing::debug!("Connection '{}' opened", connection_id);
        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomEvent, message_pusher::MockMessagePusher};
    use crate::usecase::test_support::Fixture;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_sender() {
        // テスト項目: 接続すると払い出した ID で送信できるようになる
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = ConnectClientUseCase::new(fixture.pusher.clone());
        let (tx, mut rx) = mpsc::channel(4);

        // when (操作):
        let connection_id = usecase.execute(tx).await;

        // then (期待する結果):
        fixture
            .pusher
            .push_to(&connection_id, &RoomEvent::RoomClosed)
            .await
            .unwrap();
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_connect_does_not_join_any_group() {
        // テスト項目: 接続だけではどのグループにも参加しない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_register_client().times(1).return_const(());
        pusher.expect_join_group().never();
        let usecase = ConnectClientUseCase::new(Arc::new(pusher));
        let (tx, _rx) = mpsc::channel(4);

        // when (操作):
        let first = usecase.execute(tx).await;

        // then (期待する結果):
        assert_ne!(first, ConnectionId::generate());
    }
}
