use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

#[utoipa::path(
    get,
    path = "/api/archive",
    responses(
        (status = 200, description = "Zip bundle from the most recent archive run"),
        (status = 404, description = "No archive has been built yet")
    ),
    tag = "archive"
)]
pub async fn download_archive(State(state): State<crate::AppState>) -> Result<Response, AppError> {
    let path = state.archiver.archive_path();

    let data = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound("no archive has been built yet".to_string())
        } else {
            AppError::Internal(format!("failed to read archive: {e}"))
        }
    })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("archive.zip");

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, data).into_response())
}
