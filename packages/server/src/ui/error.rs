//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    infrastructure::dto::http::MessageDto,
    usecase::{CloseRoomError, CreateRoomError, GetRoomError},
};

/// Error returned by the HTTP handlers, rendered as `{"message": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (
            status,
            Json(MessageDto {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<CreateRoomError> for ApiError {
    fn from(e: CreateRoomError) -> Self {
        match e {
            CreateRoomError::InvalidInput(_) => Self::BadRequest(e.to_string()),
            CreateRoomError::Conflict(_) => Self::Conflict(e.to_string()),
            CreateRoomError::IdSpaceExhausted(_) => Self::Conflict(e.to_string()),
        }
    }
}

impl From<GetRoomError> for ApiError {
    fn from(e: GetRoomError) -> Self {
        match e {
            GetRoomError::InvalidInput(_) => Self::BadRequest(e.to_string()),
            GetRoomError::NotFound(_) => Self::NotFound(e.to_string()),
        }
    }
}

impl From<CloseRoomError> for ApiError {
    fn from(e: CloseRoomError) -> Self {
        match e {
            CloseRoomError::InvalidInput(_) => Self::BadRequest(e.to_string()),
            CloseRoomError::NotFound(_) => Self::NotFound(e.to_string()),
            CloseRoomError::Unauthorized => Self::Forbidden(e.to_string()),
        }
    }
}
