use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

pub const SERVICE_BANNER: &str = "OCR Text Extraction and Audio Generation API";

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

pub async fn root_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(RootResponse {
            message: SERVICE_BANNER.to_string(),
        }),
    )
}
