//! Domain layer: value objects, entities, room events and the interfaces the
//! use cases depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Doubt, Room, Session, VoteDirection, VoteOutcome};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::RoomEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{DoubtRepository, RoomRepository};
pub use value_object::{
    ConnectionId, DoubtBody, DoubtId, HostContact, Identity, Role, RoomId, RoomIdFactory,
    Timestamp, Topic,
};
