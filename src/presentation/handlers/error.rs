use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{AudioLookupError, NarrationError};

pub const INVALID_LANGUAGE_DETAIL: &str = "Invalid language code provided.";
pub const AUDIO_NOT_FOUND_DETAIL: &str = "Audio file not found.";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Failure of an HTTP operation, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

impl From<NarrationError> for ApiError {
    fn from(error: NarrationError) -> Self {
        if error.is_invalid_language() {
            Self::new(StatusCode::BAD_REQUEST, INVALID_LANGUAGE_DETAIL)
        } else {
            Self::internal(error.to_string())
        }
    }
}

impl From<AudioLookupError> for ApiError {
    fn from(error: AudioLookupError) -> Self {
        match error {
            AudioLookupError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, AUDIO_NOT_FOUND_DETAIL)
            }
            AudioLookupError::Storage(e) => Self::internal(e.to_string()),
        }
    }
}
