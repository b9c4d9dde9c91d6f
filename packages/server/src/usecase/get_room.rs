//! UseCase: Room 参照処理
//!
//! Room の存在確認・ホスト判定・Doubt のスナップショット・類似度ヒント。
//! いずれも読み取りのみで、状態は変更しません。

use std::sync::Arc;

use undoubt_shared::similarity::{self, SimilarityLevel};

use crate::domain::{Doubt, DoubtRepository, Identity, Room, RoomId, RoomRepository};

use super::error::GetRoomError;

/// Advisory similarity of a draft against a room's doubts
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityHint {
    /// 0.0..=1.0
    pub score: f64,
    pub level: SimilarityLevel,
    pub best_match: Option<Doubt>,
}

impl SimilarityHint {
    pub fn percent(&self) -> f64 {
        self.score * 100.0
    }
}

/// Room 参照のユースケース
pub struct GetRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    doubts: Arc<dyn DoubtRepository>,
}

impl GetRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, doubts: Arc<dyn DoubtRepository>) -> Self {
        Self { rooms, doubts }
    }

    pub async fn get(&self, room_id: &str) -> Result<Room, GetRoomError> {
        let room_id = RoomId::new(room_id.to_string())?;
        self.rooms
            .get_room(&room_id)
            .await
            .map_err(|_| GetRoomError::NotFound(room_id.into_string()))
    }

    /// `identity` がホストかどうかと Room 本体
    pub async fn is_host(
        &self,
        room_id: &str,
        identity: &str,
    ) -> Result<(bool, Room), GetRoomError> {
        let identity = Identity::new(identity.to_string())?;
        let room = self.get(room_id).await?;
        Ok((room.is_hosted_by(&identity), room))
    }

    /// Room の Doubt 一覧（作成順）
    ///
    /// Room が存在しない場合は空の一覧を返します。
    pub async fn snapshot(&self, room_id: &str) -> Result<Vec<Doubt>, GetRoomError> {
        let room_id = RoomId::new(room_id.to_string())?;
        let mut doubts = self.doubts.list_by_room(&room_id).await;
        doubts.sort_by_key(|d| d.created_at);
        Ok(doubts)
    }

    /// 下書き `text` と Room 内の Doubt の類似度ヒント
    pub async fn similarity(
        &self,
        room_id: &str,
        text: &str,
    ) -> Result<SimilarityHint, GetRoomError> {
        let doubts = self.snapshot(room_id).await?;
        let bodies: Vec<&str> = doubts.iter().map(|d| d.body.as_str()).collect();

        let hint = match similarity::best_match(text, &bodies) {
            Some(best) => SimilarityHint {
                score: best.score,
                level: best.level(),
                best_match: doubts.get(best.index).cloned(),
            },
            None => SimilarityHint {
                score: 0.0,
                level: SimilarityLevel::Low,
                best_match: None,
            },
        };
        Ok(hint)
    }
}
