//! Events delivered from the server to room members.

use super::{
    entity::{Doubt, Room, VoteDirection},
    value_object::{DoubtId, Role, RoomId},
};

/// Outbound room event
///
/// Broadcast events (`DoubtCreated`, `VoteApplied`, `AnsweredToggled`,
/// `RoomClosed`) are only emitted after the state change they describe has
/// been persisted. The others are addressed to a single connection.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Room metadata sent to a connection that joined
    RoomInfo { room: Room, role: Role },
    /// Full list of the room's doubts, sent right after `RoomInfo`
    DoubtSnapshot(Vec<Doubt>),
    DoubtCreated(Doubt),
    VoteApplied {
        doubt_id: DoubtId,
        direction: VoteDirection,
    },
    AnsweredToggled { doubt_id: DoubtId, answered: bool },
    RoomClosed,
    /// Join attempt for a room that does not exist (or was closed)
    RoomNotFound(RoomId),
    /// Local notice for a dropped action (sender only)
    ActionRejected {
        action: &'static str,
        reason: String,
    },
}

impl RoomEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoomInfo { .. } => "room-info",
            Self::DoubtSnapshot(_) => "doubt-snapshot",
            Self::DoubtCreated(_) => "doubt-created",
            Self::VoteApplied {
                direction: VoteDirection::Up,
                ..
            } => "vote-up-applied",
            Self::VoteApplied {
                direction: VoteDirection::Down,
                ..
            } => "vote-down-applied",
            Self::AnsweredToggled { .. } => "answered-toggled",
            Self::RoomClosed => "room-closed",
            Self::RoomNotFound(_) => "room-not-found",
            Self::ActionRejected { .. } => "action-rejected",
        }
    }
}
