//! UseCase: 投票処理
//!
//! 投票は冪等です。同じ投票者の重複 up と、投票していない人の down は
//! 変化なしとして扱い、ブロードキャストしません（票の二重計上を防ぐ）。

use std::sync::Arc;

use crate::domain::{
    DoubtId, DoubtRepository, MessagePusher, RoomEvent, Session, VoteDirection, VoteOutcome,
};

use super::{
    binding::{acting_identity, bound_room},
    error::RoomEventError,
    room_sync::RoomSyncGate,
};

/// 投票のユースケース
pub struct VoteDoubtUseCase {
    doubts: Arc<dyn DoubtRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Arc<RoomSyncGate>,
}

impl VoteDoubtUseCase {
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
        voter: Option<&str>,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, RoomEventError> {
        let room_id = bound_room(session, room_id)?;
        let voter = acting_identity(session, voter)?;
        let doubt_id = DoubtId::new(doubt_id)?;

        let _guard = self.gate.mutation(&room_id).await;
        let outcome = self
            .doubts
            .apply_vote_delta(&room_id, &doubt_id, voter, direction)
            .await?;

        if outcome.changed {
            self.message_pusher
                .broadcast(
                    &room_id,
                    &RoomEvent::VoteApplied {
                        doubt_id: doubt_id.clone(),
                        direction,
                    },
                )
                .await;
            tracing::debug!(
                "{:?} vote on '{}' by '{}' (now {})",
                direction,
                doubt_id.as_str(),
                session.identity.as_str(),
                outcome.doubt.upvotes()
            );
        } else {
            tracing::debug!(
                "{:?} vote on '{}' by '{}' was a no-op",
                direction,
                doubt_id.as_str(),
                session.identity.as_str()
            );
        }
        Ok(outcome)
    }
}
