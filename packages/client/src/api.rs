//! HTTP calls made before opening the WebSocket.

use reqwest::{Client, Response, StatusCode};
use undoubt_server::infrastructure::dto::http::{
    CreateRoomRequest, CreateRoomResponse, HostCheckDto, MessageDto, RoomDto, RoomExistsDto,
};

use crate::error::ClientError;

/// Thin wrapper over the room endpoints of `/api`
#[derive(Debug, Clone)]
pub struct RoomApi {
    client: Client,
    base_url: String,
}

impl RoomApi {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `POST /api/rooms`
    pub async fn create_room(&self, request: &CreateRoomRequest) -> Result<RoomDto, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/rooms", self.base_url))
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<CreateRoomResponse>().await?.room)
    }

    /// `GET /api/rooms/{room_id}`; `None` when the room does not exist
    pub async fn get_room(&self, room_id: &str) -> Result<Option<RoomDto>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/rooms/{}", self.base_url, room_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        Ok(response.json::<RoomExistsDto>().await?.room)
    }

    /// `GET /api/rooms/{room_id}/host/{identity}`
    pub async fn is_host(&self, room_id: &str, identity: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/api/rooms/{}/host/{}",
                self.base_url, room_id, identity
            ))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<HostCheckDto>().await?.is_host)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<MessageDto>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Derive the WebSocket endpoint from the HTTP origin
pub fn websocket_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/ws", base)
}
