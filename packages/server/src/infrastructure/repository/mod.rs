//! Repository implementations.

pub mod inmemory;

pub use inmemory::{InMemoryDoubtRepository, InMemoryRoomRepository};
