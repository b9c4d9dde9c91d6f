//! UseCase layer.
//!
//! One use case per operation. Room events from a live connection go through
//! the session binding checks in [`binding`] before touching any store.

pub mod binding;
pub mod close_room;
pub mod connect_client;
pub mod create_room;
pub mod disconnect_client;
pub mod error;
pub mod get_room;
pub mod join_room;
pub mod room_sync;
#[cfg(test)]
pub(crate) mod test_support;
pub mod submit_doubt;
pub mod toggle_answered;
pub mod vote_doubt;

pub use close_room::CloseRoomUseCase;
pub use connect_client::ConnectClientUseCase;
pub use create_room::{CreateRoomInput, CreateRoomUseCase};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{CloseRoomError, CreateRoomError, GetRoomError, JoinRoomError, RoomEventError};
pub use get_room::{GetRoomUseCase, SimilarityHint};
pub use join_room::JoinRoomUseCase;
pub use room_sync::RoomSyncGate;
pub use submit_doubt::SubmitDoubtUseCase;
pub use toggle_answered::ToggleAnsweredUseCase;
pub use vote_doubt::VoteDoubtUseCase;
