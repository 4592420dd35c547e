use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::SessionContext;
use crate::state::AppState;
use crate::storage::paths::safe_component;

#[utoipa::path(
    get,
    path = "/{folder}/{filename}",
    tag = "Files",
    operation_id = "getFile",
    summary = "Stream an uploaded file",
    description = "Resolves the file under `<folder>/images/` first and the flat `<folder>/` \
        layout second, so files stored before the layout change stay retrievable. The folder \
        key is a participant code, or a numeric participant id for pre-migration records.",
    params(
        ("folder" = String, Path, description = "Participant folder key"),
        ("filename" = String, Path, description = "Stored filename, e.g. `3.jpg`"),
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Unsafe folder key or filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session), fields(folder, filename))]
pub async fn get_file(
    _session: SessionContext,
    State(state): State<AppState>,
    Path((folder, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let folder =
        safe_component(&folder).map_err(|e| AppError::Validation(e.message().into()))?;
    let filename =
        safe_component(&filename).map_err(|e| AppError::Validation(e.message().into()))?;

    let path = state
        .storage
        .resolve_read(folder, filename)
        .await
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::Io(format!("Failed to open {}: {e}", path.display())))?;
    let size = file
        .metadata()
        .await
        .map(|m| m.len())
        .map_err(|e| AppError::Io(format!("Failed to stat {}: {e}", path.display())))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let content_type = mime_guess::from_path(filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}
