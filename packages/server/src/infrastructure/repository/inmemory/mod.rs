//! InMemory Repository 実装
//!
//! プロセスのメモリ上に保持するストア。再起動で内容は失われます。

pub mod doubt;
pub mod room;

pub use doubt::InMemoryDoubtRepository;
pub use room::InMemoryRoomRepository;
