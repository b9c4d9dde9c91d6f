//! Entities.

use std::collections::BTreeSet;

use serde::Serialize;

use super::value_object::{
    ConnectionId, DoubtBody, DoubtId, HostContact, Identity, Role, RoomId, Timestamp, Topic,
};

/// A Q&A room owned by exactly one host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: RoomId,
    /// Set once at creation, never reassigned
    pub host: Identity,
    pub host_contact: HostContact,
    pub topic: Option<Topic>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(
        id: RoomId,
        host: Identity,
        host_contact: HostContact,
        topic: Option<Topic>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            host,
            host_contact,
            topic,
            created_at,
        }
    }

    pub fn is_hosted_by(&self, identity: &Identity) -> bool {
        &self.host == identity
    }

    /// Authoritative role of `identity` in this room
    pub fn role_of(&self, identity: &Identity) -> Role {
        if self.is_hosted_by(identity) {
            Role::Host
        } else {
            Role::Participant
        }
    }
}

/// Direction of a vote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

/// A question submitted into a room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doubt {
    pub id: DoubtId,
    pub room_id: RoomId,
    pub body: DoubtBody,
    pub submitter: Identity,
    /// Each voter appears at most once; the upvote count is its size
    pub voters: BTreeSet<Identity>,
    pub answered: bool,
    pub created_at: Timestamp,
}

impl Doubt {
    pub fn new(
        id: DoubtId,
        room_id: RoomId,
        body: DoubtBody,
        submitter: Identity,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            body,
            submitter,
            voters: BTreeSet::new(),
            answered: false,
            created_at,
        }
    }

    pub fn upvotes(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voted(&self, voter: &Identity) -> bool {
        self.voters.contains(voter)
    }

    /// Apply a vote. Returns `false` when the vote was a no-op
    /// (up-vote by an existing voter, down-vote by a non-voter).
    pub fn apply_vote(&mut self, voter: Identity, direction: VoteDirection) -> bool {
        match direction {
            VoteDirection::Up => self.voters.insert(voter),
            VoteDirection::Down => self.voters.remove(&voter),
        }
    }
}

/// Result of a vote delta applied by the doubt store
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub doubt: Doubt,
    /// `false` when the vote was idempotently ignored
    pub changed: bool,
}

/// Binding between a live connection and the room it joined.
///
/// Never persisted; dropped when the connection goes away.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub room_id: RoomId,
    /// Resolved server-side from the room's host identity
    pub role: Role,
    pub identity: Identity,
}

impl Session {
    pub fn is_host(&self) -> bool {
        self.role.is_host()
    }
}
