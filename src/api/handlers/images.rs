use crate::api::error::AppError;
use crate::models::ImageRecord;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
pub struct SaveImageRequest {
    /// Raw base64, or a `data:image/...;base64,<data>` data URL.
    #[validate(length(min = 1, message = "No image data was sent"))]
    pub image: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveImageResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub path: String,
    pub folder: String,
    pub size: u64,
}

#[derive(Serialize, ToSchema)]
pub struct ImageListResponse {
    pub success: bool,
    pub folder: String,
    pub count: usize,
    pub images: Vec<ImageRecord>,
}

#[utoipa::path(
    post,
    path = "/save_image",
    request_body = SaveImageRequest,
    responses(
        (status = 200, description = "Image saved", body = SaveImageResponse),
        (status = 400, description = "Missing, empty, or malformed image payload"),
        (status = 500, description = "Storage failure")
    ),
    tag = "images"
)]
pub async fn save_image(
    State(state): State<crate::AppState>,
    Json(req): Json<SaveImageRequest>,
) -> Result<Json<SaveImageResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let image = req
        .image
        .ok_or_else(|| AppError::BadRequest("No image data was sent".to_string()))?;

    let saved = state.store.save_base64(&image).await?;
    let folder = state.store.root().display().to_string();

    info!(
        path = %saved.path.display(),
        folder = %folder,
        size = saved.size,
        "📸 Image saved"
    );

    Ok(Json(SaveImageResponse {
        success: true,
        message: "Image saved successfully".to_string(),
        filename: saved.filename,
        path: saved.path.display().to_string(),
        folder,
        size: saved.size,
    }))
}

#[utoipa::path(
    get,
    path = "/image/{filename}",
    params(
        ("filename" = String, Path, description = "Stored image filename")
    ),
    responses(
        (status = 200, description = "Raw image bytes"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn get_image(
    State(state): State<crate::AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (bytes, content_type) = state.store.load(&filename).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

#[utoipa::path(
    get,
    path = "/api/images",
    responses(
        (status = 200, description = "Stored images, newest first", body = ImageListResponse),
        (status = 500, description = "Enumeration failure")
    ),
    tag = "images"
)]
pub async fn api_images(
    State(state): State<crate::AppState>,
) -> Result<Json<ImageListResponse>, AppError> {
    let images = state.store.list().await?;

    Ok(Json(ImageListResponse {
        success: true,
        folder: state.store.root().display().to_string(),
        count: images.len(),
        images,
    }))
}
