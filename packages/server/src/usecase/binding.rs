//! Checks that bind an inbound room event to the connection's session.
//!
//! A connection joins exactly one room, as exactly one identity. Events that
//! name another room, or carry another identity, are dropped.

use crate::domain::{Identity, RoomId, Session};

use super::error::RoomEventError;

/// The session of a connection that has joined a room
pub fn require_session(session: Option<&Session>) -> Result<&Session, RoomEventError> {
    session.ok_or(RoomEventError::NotJoined)
}

/// Resolve the room an event targets; it must be the session's room
pub fn bound_room(session: &Session, requested: &str) -> Result<RoomId, RoomEventError> {
    if session.room_id.as_str() != requested.trim() {
        return Err(RoomEventError::RoomMismatch {
            bound: session.room_id.as_str().to_string(),
            requested: requested.to_string(),
        });
    }
    Ok(session.room_id.clone())
}

/// Resolve the identity an event acts as
///
/// An absent or blank claim falls back to the session identity.
pub fn acting_identity(
    session: &Session,
    claimed: Option<&str>,
) -> Result<Identity, RoomEventError> {
    match claimed.map(str::trim) {
        None | Some("") => Ok(session.identity.clone()),
        Some(claimed) if claimed == session.identity.as_str() => Ok(session.identity.clone()),
        Some(_) => Err(RoomEventError::IdentityMismatch),
    }
}

/// Privileged actions require the role resolved at join time
pub fn require_host(session: &Session) -> Result<(), RoomEventError> {
    if session.is_host() {
        Ok(())
    } else {
        Err(RoomEventError::Unauthorized)
    }
}
