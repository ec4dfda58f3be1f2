use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::error::AppError;
use crate::models::{ArchiveInfo, CropRect, ExportResponse, ImageEntry};
use crate::utils::fingerprint::content_fingerprint;
use crate::utils::validation::{file_stem, sanitize_output_name};

/// Assemble the batch from multipart fields, in order.
///
/// A `file` part starts a new entry; `name` and `crop` parts attach to the
/// most recent one. A missing `name` part keeps the default (the upload's
/// file stem); an empty one clears the output name, which skips the entry.
async fn collect_batch(multipart: &mut Multipart) -> Result<Vec<ImageEntry>, AppError> {
    let mut entries: Vec<ImageEntry> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let original_filename = field.file_name().unwrap_or("unnamed").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?
                    .to_vec();

                let fingerprint = content_fingerprint(&bytes);
                let default_name = sanitize_output_name(&file_stem(&original_filename));

                entries.push(ImageEntry {
                    original_filename,
                    bytes,
                    fingerprint,
                    output_name: default_name,
                    crop: None,
                });
            }
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if let Some(entry) = entries.last_mut() {
                    entry.output_name = sanitize_output_name(&text);
                }
            }
            "crop" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let rect: CropRect = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("invalid crop field: {e}")))?;
                if let Some(entry) = entries.last_mut() {
                    entry.crop = Some(rect);
                }
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    if entries.is_empty() {
        return Err(AppError::BadRequest("no files provided".to_string()));
    }

    Ok(entries)
}

#[utoipa::path(
    post,
    path = "/api/export",
    request_body(content = Multipart, description = "Image files with per-file name and optional crop fields"),
    responses(
        (status = 200, description = "Per-file export results", body = ExportResponse),
        (status = 400, description = "Malformed request or no files provided")
    ),
    tag = "export"
)]
pub async fn export_images(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExportResponse>, AppError> {
    let entries = collect_batch(&mut multipart).await?;
    let report = state.processor.process_batch(&entries)?;

    Ok(Json(ExportResponse {
        saved: report.saved_count(),
        results: report.outcomes,
        archive: None,
        warning: None,
    }))
}

#[utoipa::path(
    post,
    path = "/api/export/archive",
    request_body(content = Multipart, description = "Image files with per-file name and optional crop fields"),
    responses(
        (status = 200, description = "Per-file export results plus zip bundle info", body = ExportResponse),
        (status = 400, description = "Malformed request or no files provided")
    ),
    tag = "export"
)]
pub async fn export_and_archive(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExportResponse>, AppError> {
    let entries = collect_batch(&mut multipart).await?;
    let report = state.processor.process_batch(&entries)?;

    let (archive, warning) = if report.saved_paths.is_empty() {
        // Nothing to bundle; tell the user instead of producing an empty zip
        (None, Some("no images processed".to_string()))
    } else {
        let files = state
            .archiver
            .build(&report.saved_paths)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let filename = state
            .archiver
            .archive_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("archive.zip")
            .to_string();
        (Some(ArchiveInfo { filename, files }), None)
    };

    Ok(Json(ExportResponse {
        saved: report.saved_count(),
        results: report.outcomes,
        archive,
        warning,
    }))
}
