//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! Room Registry と Doubt Store はそれぞれ独立した trait です。
//! どちらも 1 レコードに対する更新をアトミックな read-modify-write として
//! 実行しなければなりません（同一 Doubt への同時投票で更新が失われないこと）。

use async_trait::async_trait;

use super::{
    DoubtBody, DoubtId, HostContact, Identity, RepositoryError, Room, RoomId, Timestamp, Topic,
    entity::{Doubt, VoteDirection, VoteOutcome},
};

/// Room Registry
///
/// Room レコードを排他的に所有するストアへのインターフェース。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を作成（同じ ID が既に存在する場合は `RoomAlreadyExists`）
    async fn create_room(
        &self,
        room_id: RoomId,
        host: Identity,
        host_contact: HostContact,
        topic: Option<Topic>,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError>;

    /// Room を取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// `identity` が Room のホストかどうか（Room が存在しない場合は false）
    async fn is_host(&self, room_id: &RoomId, identity: &Identity) -> bool;

    /// Room を削除（存在しない Room の削除はエラーにならない）
    async fn delete_room(&self, room_id: &RoomId);
}

/// Doubt Store
///
/// Doubt レコードを排他的に所有するストアへのインターフェース。
#[async_trait]
pub trait DoubtRepository: Send + Sync {
    /// Doubt を作成（投票 0・未回答で初期化）
    async fn create_doubt(
        &self,
        room_id: RoomId,
        body: DoubtBody,
        submitter: Identity,
        created_at: Timestamp,
    ) -> Result<Doubt, RepositoryError>;

    /// Room の全 Doubt を取得（順序は保証しない）
    async fn list_by_room(&self, room_id: &RoomId) -> Vec<Doubt>;

    /// Doubt を 1 件取得
    async fn get_doubt(&self, room_id: &RoomId, doubt_id: &DoubtId)
    -> Result<Doubt, RepositoryError>;

    /// 投票をアトミックに適用（冪等: 重複した up / 未投票の down は no-op）
    async fn apply_vote_delta(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
        voter: Identity,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, RepositoryError>;

    /// 回答済みフラグを直接設定
    async fn set_answered(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
        answered: bool,
    ) -> Result<Doubt, RepositoryError>;

    /// 回答済みフラグをアトミックに反転
    async fn toggle_answered(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
    ) -> Result<Doubt, RepositoryError>;

    /// Room の全 Doubt を削除（冪等）
    async fn delete_all_for_room(&self, room_id: &RoomId);
}
