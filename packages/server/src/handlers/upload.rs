use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use crate::entity::{file_upload, participant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{ParticipantSession, SessionContext};
use crate::models::upload::{UploadDeleteResponse, UploadListResponse, UploadResponse};
use crate::state::AppState;
use crate::storage::cleanup;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(256 * 1024 * 1024) // 256 MB, large enough for short videos
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Uploads",
    operation_id = "listMyUploads",
    summary = "List the logged-in participant's uploads",
    responses(
        (status = 200, description = "Upload list", body = UploadListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(participant_id = session.participant_id))]
pub async fn list_my_uploads(
    session: ParticipantSession,
    State(state): State<AppState>,
) -> Result<Json<UploadListResponse>, AppError> {
    let models = file_upload::Entity::find()
        .filter(file_upload::Column::ParticipantId.eq(session.participant_id))
        .order_by_asc(file_upload::Column::Id)
        .all(&state.db)
        .await?;

    let total = models.len() as u64;
    let uploads = models.into_iter().map(UploadResponse::from).collect();

    Ok(Json(UploadListResponse {
        uploads,
        total,
        folder: session.code,
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Uploads",
    operation_id = "uploadFile",
    summary = "Upload a photo or video",
    description = "Accepts a multipart `file` field, assigns the next sequential filename in the \
        participant's folder (`1.jpg`, `2.mp4`, ...), writes it to \
        `<uploads_root>/<code>/images/`, and records it. The file is classified as an image \
        when its content type starts with `image/`, and as a video otherwise.",
    request_body(content_type = "multipart/form-data", description = "The file to upload"),
    responses(
        (status = 201, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file selected, or a malformed form (NO_FILE_SELECTED, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, multipart), fields(participant_id = session.participant_id))]
pub async fn upload_file(
    session: ParticipantSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (staging_path, original, declared_type) =
        stage_file_field(&mut multipart, &state.storage).await?;

    let result = async {
        // Serialize index assignment per participant so two concurrent
        // uploads cannot claim the same sequential name.
        let lock = state.upload_lock(session.participant_id);
        let _guard = lock.lock().await;

        let existing: Vec<String> = file_upload::Entity::find()
            .filter(file_upload::Column::ParticipantId.eq(session.participant_id))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|u| u.stored_filename)
            .collect();

        let stored = stored_name_for(next_index(&existing), &original);
        let kind = classify_kind(declared_type.as_deref(), &original);

        let dir = state.storage.ensure_folder(&session.code).await?;
        let final_path = dir.join(&stored);
        tokio::fs::rename(&staging_path, &final_path).await?;

        let model = file_upload::ActiveModel {
            stored_filename: Set(stored),
            original_filename: Set(original),
            kind: Set(kind.to_string()),
            participant_id: Set(session.participant_id),
            uploaded_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let created = match model.insert(&state.db).await {
            Ok(created) => created,
            Err(e) => {
                // The row is the source of truth; without it the renamed file
                // would be an orphan, so take it back out best-effort.
                let _ = tokio::fs::remove_file(&final_path).await;
                return Err(e.into());
            }
        };

        Ok((StatusCode::CREATED, Json(UploadResponse::from(created))))
    }
    .await;

    // Best effort; gone already when the rename happened.
    let _ = tokio::fs::remove_file(&staging_path).await;

    result
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Uploads",
    operation_id = "deleteUpload",
    summary = "Delete an upload",
    description = "Deletes an upload as either the owning participant or an administrator. The \
        file is looked up across the canonical and legacy locations and removed if found; the \
        store row is removed regardless, and `removed_from_disk` reports what happened on disk.",
    params(("id" = i32, Path, description = "Upload ID")),
    responses(
        (status = 200, description = "Upload deleted", body = UploadDeleteResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Upload belongs to another participant (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Upload not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(id))]
pub async fn delete_upload(
    session: SessionContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UploadDeleteResponse>, AppError> {
    let upload = file_upload::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Upload not found".into()))?;

    let code = match &session {
        SessionContext::Participant(p) => {
            if p.participant_id != upload.participant_id {
                return Err(AppError::Forbidden);
            }
            p.code.clone()
        }
        // Admin deletions run outside any participant session, so the code
        // comes from the store; fall back to the id-keyed folder name for
        // rows whose participant has somehow vanished.
        SessionContext::Admin(_) => participant::Entity::find_by_id(upload.participant_id)
            .one(&state.db)
            .await?
            .map(|p| p.code)
            .unwrap_or_else(|| upload.participant_id.to_string()),
    };

    let removed_from_disk = cleanup::remove_upload_file(
        &state.storage,
        &code,
        upload.participant_id,
        &upload.stored_filename,
    )
    .await;

    file_upload::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(UploadDeleteResponse {
        id,
        removed_from_disk,
    }))
}

/// Next sequential index for a participant's folder: one past the highest
/// index already recorded. Equals count + 1 until something is deleted, and
/// never hands out an index a previous upload used.
fn next_index(stored_names: &[String]) -> u32 {
    stored_names
        .iter()
        .filter_map(|name| {
            name.split('.')
                .next()
                .and_then(|stem| stem.parse::<u32>().ok())
        })
        .max()
        .unwrap_or(0)
        + 1
}

/// `<index><original extension, lowercased>`; no extension means a bare index.
fn stored_name_for(index: u32, original: &str) -> String {
    match std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) => format!("{index}.{}", ext.to_lowercase()),
        None => index.to_string(),
    }
}

/// Image iff the content type has an `image/` prefix; everything else is
/// treated as video. Falls back to guessing from the filename when the part
/// declared no type.
fn classify_kind(declared_type: Option<&str>, original: &str) -> &'static str {
    let mime = declared_type
        .map(str::to_string)
        .or_else(|| mime_guess::from_path(original).first().map(|m| m.to_string()));
    match mime {
        Some(m) if m.starts_with("image/") => "image",
        _ => "video",
    }
}

/// Read the `file` field out of the multipart body into a staging file.
///
/// Exactly one `file` part is accepted. Any failure after a part has been
/// staged removes the staging file again, so rejected requests leave nothing
/// behind in the uploads root.
async fn stage_file_field(
    multipart: &mut Multipart,
    storage: &crate::storage::paths::UploadStorage,
) -> Result<(std::path::PathBuf, String, Option<String>), AppError> {
    let mut staged: Option<(std::path::PathBuf, String, Option<String>)> = None;

    let result = async {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            if field.name() != Some("file") {
                continue; // Ignore unknown fields.
            }
            if staged.is_some() {
                return Err(AppError::Validation(
                    "Only one file per upload request".into(),
                ));
            }

            let original = field
                .file_name()
                .map(str::to_string)
                .filter(|name| !name.trim().is_empty())
                .ok_or(AppError::NoFileSelected)?;
            let declared_type = field.content_type().map(str::to_string);

            let staging_path = storage.staging_path();
            if let Err(e) = stream_field_to_file(field, &staging_path).await {
                let _ = tokio::fs::remove_file(&staging_path).await;
                return Err(e);
            }
            staged = Some((staging_path, original, declared_type));
        }
        Ok(())
    }
    .await;

    match result {
        Ok(()) => staged.ok_or(AppError::NoFileSelected),
        Err(e) => {
            if let Some((path, _, _)) = staged {
                let _ = tokio::fs::remove_file(&path).await;
            }
            Err(e)
        }
    }
}

async fn stream_field_to_file(
    mut field: axum::extract::multipart::Field<'_>,
    path: &std::path::Path,
) -> Result<(), AppError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| AppError::Io(format!("Failed to create staging file: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Io(format!("Staging write failed: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Io(format!("Staging flush failed: {e}")))?;

    Ok(())
}
