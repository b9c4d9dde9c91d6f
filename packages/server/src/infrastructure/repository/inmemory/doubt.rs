//! InMemory Doubt Store 実装
//!
//! Room ごとに Doubt を作成順で保持します。
//! 投票と回答済みフラグの更新は読み取りと書き込みを 1 つのロック内で行い、
//! 同時更新で変更が失われないようにしています。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Doubt, DoubtBody, DoubtId, DoubtRepository, Identity, RepositoryError, RoomId, Timestamp,
    VoteDirection, VoteOutcome,
};

/// インメモリ Doubt Store 実装
#[derive(Default)]
pub struct InMemoryDoubtRepository {
    /// Key: Room ID, Value: 作成順の Doubt
    doubts: Arc<Mutex<HashMap<RoomId, Vec<Doubt>>>>,
}

impl InMemoryDoubtRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(room_id: &RoomId, doubt_id: &DoubtId) -> RepositoryError {
    RepositoryError::DoubtNotFound {
        room_id: room_id.as_str().to_string(),
        doubt_id: doubt_id.as_str().to_string(),
    }
}

fn find_mut<'a>(
    doubts: &'a mut HashMap<RoomId, Vec<Doubt>>,
    room_id: &RoomId,
    doubt_id: &DoubtId,
) -> Result<&'a mut Doubt, RepositoryError> {
    doubts
        .get_mut(room_id)
        .and_then(|list| list.iter_mut().find(|d| &d.id == doubt_id))
        .ok_or_else(|| not_found(room_id, doubt_id))
}

#[async_trait]
impl DoubtRepository for InMemoryDoubtRepository {
    async fn create_doubt(
        &self,
        room_id: RoomId,
        body: DoubtBody,
        submitter: Identity,
        created_at: Timestamp,
    ) -> Result<Doubt, RepositoryError> {
        let doubt = Doubt::new(
            DoubtId::generate(),
            room_id.clone(),
            body,
            submitter,
            created_at,
        );

        let mut doubts = self.doubts.lock().await;
        doubts.entry(room_id).or_default().push(doubt.clone());
        tracing::debug!(
            "Doubt '{}' created in room '{}'",
            doubt.id.as_str(),
            doubt.room_id.as_str()
        );
        Ok(doubt)
    }

    async fn list_by_room(&self, room_id: &RoomId) -> Vec<Doubt> {
        let doubts = self.doubts.lock().await;
        doubts.get(room_id).cloned().unwrap_or_default()
    }

    async fn get_doubt(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
    ) -> Result<Doubt, RepositoryError> {
        let doubts = self.doubts.lock().await;
        doubts
            .get(room_id)
            .and_then(|list| list.iter().find(|d| &d.id == doubt_id))
            .cloned()
            .ok_or_else(|| not_found(room_id, doubt_id))
    }

    async fn apply_vote_delta(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
        voter: Identity,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, RepositoryError> {
        let mut doubts = self.doubts.lock().await;
        let doubt = find_mut(&mut doubts, room_id, doubt_id)?;
        let changed = doubt.apply_vote(voter, direction);
        Ok(VoteOutcome {
            doubt: doubt.clone(),
            changed,
        })
    }

    async fn set_answered(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
        answered: bool,
    ) -> Result<Doubt, RepositoryError> {
        let mut doubts = self.doubts.lock().await;
        let doubt = find_mut(&mut doubts, room_id, doubt_id)?;
        doubt.answered = answered;
        Ok(doubt.clone())
    }

    async fn toggle_answered(
        &self,
        room_id: &RoomId,
        doubt_id: &DoubtId,
    ) -> Result<Doubt, RepositoryError> {
        let mut doubts = self.doubts.lock().await;
        let doubt = find_mut(&mut doubts, room_id, doubt_id)?;
        doubt.answered = !doubt.answered;
        Ok(doubt.clone())
    }

    async fn delete_all_for_room(&self, room_id: &RoomId) {
        let mut doubts = self.doubts.lock().await;
        if let Some(removed) = doubts.remove(room_id) {
            tracing::debug!(
                "Deleted {} doubt(s) of room '{}'",
                removed.len(),
                room_id.as_str()
            );
        }
    }
}
