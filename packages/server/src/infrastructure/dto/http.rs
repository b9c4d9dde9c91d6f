//! HTTP API DTOs.

use serde::{Deserialize, Serialize};
use undoubt_shared::similarity::SimilarityLevel;

use super::websocket::DoubtDto;

/// Body of `POST /api/rooms`
///
/// camelCase aliases keep older web clients working. Missing required
/// fields deserialize as empty and are rejected by validation (400).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateRoomRequest {
    #[serde(default, alias = "roomId")]
    pub room_id: Option<String>,
    #[serde(default, alias = "hostId")]
    pub host_id: String,
    #[serde(default, alias = "hostEmail", alias = "hostContact")]
    pub host_contact: String,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDto {
    pub room_id: String,
    pub host_id: String,
    pub host_contact: String,
    pub topic: Option<String>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub message: String,
    pub room: RoomDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomExistsDto {
    pub exists: bool,
    pub room: Option<RoomDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCheckDto {
    pub is_host: bool,
    pub room: RoomDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityQuery {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityDto {
    pub score: f64,
    pub percent: f64,
    pub level: SimilarityLevel,
    pub best_match: Option<DoubtDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseRoomQuery {
    #[serde(default)]
    pub identity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

/// Diagnostics view of a room
#[derive(Debug, Clone, Serialize)]
pub struct RoomDebugDto {
    pub room: RoomDto,
    pub doubts: Vec<DoubtDto>,
    pub members: usize,
}
