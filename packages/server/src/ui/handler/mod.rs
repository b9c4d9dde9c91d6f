//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{
    check_host, close_room, create_room, debug_room, get_room, health_check, list_doubts,
    similarity,
};
pub use websocket::websocket_handler;
