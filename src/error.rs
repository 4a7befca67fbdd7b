use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Request-scoped failures. All of them are terminal for the request and
/// rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Carries the configured cap in MB
    #[error("File too large. Max size: {0}MB")]
    FileTooLarge(u64),

    #[error("Invalid content type. Only png, jpg, gif and webp allowed")]
    InvalidContentType,

    #[error("Invalid image path")]
    InvalidImagePath,

    #[error("Image not found")]
    ImageNotFound,

    #[error("Not found")]
    RouteNotFound,

    #[error("Failed to save file")]
    SaveFailed,

    #[error("Failed to read file")]
    ReadFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::FileTooLarge(_) | Self::InvalidContentType | Self::InvalidImagePath => {
                StatusCode::BAD_REQUEST
            }
            Self::ImageNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::SaveFailed | Self::ReadFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = ErrorPayload {
            error: self.to_string(),
        };
        (self.status(), Json(payload)).into_response()
    }
}
