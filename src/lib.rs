pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::archiver::ArchiveService;
use crate::services::processor::ImageProcessor;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::process::export_images,
        handlers::process::export_and_archive,
        handlers::archive::download_archive,
    ),
    components(
        schemas(
            models::CropRect,
            models::FileOutcome,
            models::ArchiveInfo,
            models::ExportResponse,
        )
    ),
    tags(
        (name = "export", description = "Decode, crop, and save uploaded images as JPEG"),
        (name = "archive", description = "Zip bundle download")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub processor: Arc<ImageProcessor>,
    pub archiver: Arc<ArchiveService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            processor: Arc::new(ImageProcessor::new(&config)),
            archiver: Arc::new(ArchiveService::new(&config)),
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::ui::index))
        .route("/api/export", post(handlers::process::export_images))
        .route(
            "/api/export/archive",
            post(handlers::process::export_and_archive),
        )
        .route("/api/archive", get(handlers::archive::download_archive))
        .with_state(state)
}
