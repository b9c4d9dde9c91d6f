//! Terminal client for Undoubt rooms.
//!
//! Joins a room over WebSocket, keeps a [`view::RoomView`] reconciled with
//! the server's events and turns typed lines into room events.

pub mod api;
pub mod command;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
pub mod view;

pub use error::ClientError;
pub use runner::run_client;
pub use session::{SessionConfig, SessionEnd};
