//! Real-time classroom Q&A server library.
//!
//! Rooms are created by a host; participants submit doubts, vote on them and
//! watch the host mark them answered. Every state change is persisted first
//! and then fanned out to all live connections joined to the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
