use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn audio_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let audio = state.audio_library.open(&filename).await.map_err(|e| {
        tracing::debug!(error = %e, "Audio lookup failed");
        ApiError::from(e)
    })?;

    tracing::debug!(name = %audio.name, bytes = audio.size, "Streaming audio");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, audio.content_type.to_string()),
            (header::CONTENT_LENGTH, audio.size.to_string()),
        ],
        Body::from_stream(audio.body),
    ))
}
