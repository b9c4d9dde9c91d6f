//! UI layer: axum router, HTTP and WebSocket handlers.

pub mod error;
pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
