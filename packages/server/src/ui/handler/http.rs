//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::{
        http::{
            CloseRoomQuery, CreateRoomRequest, CreateRoomResponse, HostCheckDto, MessageDto,
            RoomDebugDto, RoomDto, RoomExistsDto, SimilarityDto, SimilarityQuery,
        },
        websocket::DoubtDto,
    },
    ui::{error::ApiError, state::AppState},
    usecase::{CreateRoomInput, GetRoomError},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let room = state
        .create_room_usecase
        .execute(CreateRoomInput {
            room_id: request.room_id,
            host_id: request.host_id,
            host_contact: request.host_contact,
            topic: request.topic,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse {
            message: "Room created successfully".to_string(),
            room: room.into(),
        }),
    ))
}

/// Room existence check
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<RoomExistsDto>), ApiError> {
    match state.get_room_usecase.get(&room_id).await {
        Ok(room) => Ok((
            StatusCode::OK,
            Json(RoomExistsDto {
                exists: true,
                room: Some(room.into()),
            }),
        )),
        Err(GetRoomError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(RoomExistsDto {
                exists: false,
                room: None,
            }),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Whether `identity` hosts the room
pub async fn check_host(
    State(state): State<Arc<AppState>>,
    Path((room_id, identity)): Path<(String, String)>,
) -> Result<Json<HostCheckDto>, ApiError> {
    let (is_host, room) = state.get_room_usecase.is_host(&room_id, &identity).await?;
    Ok(Json(HostCheckDto {
        is_host,
        room: room.into(),
    }))
}

/// Snapshot of the room's doubts
pub async fn list_doubts(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<DoubtDto>>, ApiError> {
    let doubts = state.get_room_usecase.snapshot(&room_id).await?;
    Ok(Json(doubts.iter().map(DoubtDto::from).collect()))
}

/// Similarity hint for a draft
pub async fn similarity(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<SimilarityQuery>,
) -> Result<Json<SimilarityDto>, ApiError> {
    let hint = state
        .get_room_usecase
        .similarity(&room_id, &query.text)
        .await?;
    Ok(Json(SimilarityDto {
        score: hint.score,
        percent: hint.percent(),
        level: hint.level,
        best_match: hint.best_match.as_ref().map(DoubtDto::from),
    }))
}

/// Close a room (host only)
pub async fn close_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<CloseRoomQuery>,
) -> Result<Json<MessageDto>, ApiError> {
    let notified = state
        .close_room_usecase
        .execute_http(&room_id, query.identity)
        .await?;
    Ok(Json(MessageDto {
        message: format!("Room closed ({notified} member(s) notified)"),
    }))
}

/// Debug endpoint: room, doubts and live member count
pub async fn debug_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDebugDto>, ApiError> {
    let room = state.get_room_usecase.get(&room_id).await?;
    let doubts = state.get_room_usecase.snapshot(&room_id).await?;
    let members = match RoomId::new(room_id) {
        Ok(id) => state.message_pusher.group_size(&id).await,
        Err(_) => 0,
    };

    Ok(Json(RoomDebugDto {
        room: RoomDto::from(&room),
        doubts: doubts.iter().map(DoubtDto::from).collect(),
        members,
    }))
}
