use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::UploadedImage;
use crate::infrastructure::observability::preview_text;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

pub const FILE_FIELD: &str = "uploadFile";
pub const LANGUAGE_FIELD: &str = "language_code";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub text: String,
    pub audio_url: String,
}

/// Multipart fields, read in full before anything is validated or written.
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    fallback_file: Option<(String, Vec<u8>)>,
    language_code: Option<String>,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let language_code = form
        .language_code
        .ok_or_else(|| ApiError::unprocessable(format!("Missing form field: {LANGUAGE_FIELD}")))?;
    let (filename, data) = form
        .file
        .or(form.fallback_file)
        .ok_or_else(|| ApiError::unprocessable(format!("Missing form field: {FILE_FIELD}")))?;

    tracing::debug!(
        filename = %filename,
        language = %language_code,
        bytes = data.len(),
        "Processing image upload"
    );

    let image = UploadedImage::new(filename, data);
    let narration = match state.narration.narrate(image, &language_code).await {
        Ok(n) => n,
        Err(e) => {
            if e.is_invalid_language() {
                tracing::warn!(language = %language_code, "Rejected unsupported language");
            } else {
                tracing::error!(error = %e, language = %language_code, "Narration failed");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        language = %language_code,
        audio = %narration.audio,
        text = %preview_text(narration.text.as_str()),
        "Narration completed"
    );

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            audio_url: narration.audio.url_path(),
            text: narration.text.into_string(),
        }),
    ))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read multipart");
        ApiError::new(e.status(), format!("Failed to read multipart: {}", e.body_text()))
    })? {
        let name = field.name().unwrap_or_default().to_string();

        if name == LANGUAGE_FIELD {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            form.language_code = Some(value);
            continue;
        }

        let Some(filename) = field.file_name().map(String::from) else {
            continue;
        };
        let data = read_bytes(field).await?;

        if name == FILE_FIELD {
            form.file = Some((filename, data));
        } else if form.fallback_file.is_none() {
            form.fallback_file = Some((filename, data));
        }
    }

    Ok(form)
}

async fn read_bytes(field: Field<'_>) -> Result<Vec<u8>, ApiError> {
    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| ApiError::new(e.status(), format!("Failed to read file: {}", e.body_text())))
}
