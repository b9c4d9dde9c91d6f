//! Utilities shared by the Undoubt server and client.
//!
//! - `logger`: tracing subscriber setup for the binaries
//! - `time`: clock abstraction and timestamp formatting
//! - `similarity`: duplicate-doubt hint scoring

pub mod logger;
pub mod similarity;
pub mod time;
