//! UseCase: 切断処理
//!
//! 接続をブロードキャストグループと MessagePusher から外します。
//! 永続化された状態には一切触れません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Session};

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 切断を実行（冪等）
    pub async fn execute(&self, connection_id: &ConnectionId, session: Option<&Session>) {
        self.message_pusher.unregister_client(connection_id).await;
        match session {
            Some(session) => tracing::info!(
                "'{}' left room '{}'",
                session.identity.as_str(),
                session.room_id.as_str()
            ),
            None => tracing::debug!("Connection '{}' closed before joining", connection_id),
        }
    }
}
