pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::storage::ImageStore;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::images::save_image,
        api::handlers::images::get_image,
        api::handlers::images::api_images,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::images::SaveImageRequest,
            api::handlers::images::SaveImageResponse,
            api::handlers::images::ImageListResponse,
            api::handlers::health::HealthResponse,
            models::ImageRecord,
        )
    ),
    tags(
        (name = "images", description = "Image capture and listing endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ImageStore>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::pages::index))
        .route("/capture", get(api::handlers::pages::capture))
        .route("/save_image", post(api::handlers::images::save_image))
        .route("/images", get(api::handlers::pages::list_images))
        .route("/image/:filename", get(api::handlers::images::get_image))
        .route("/api/images", get(api::handlers::images::api_images))
        .route("/health", get(api::handlers::health::health_check))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state)
}
