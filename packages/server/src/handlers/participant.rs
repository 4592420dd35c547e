use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{college, file_upload, participant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminSession;
use crate::extractors::json::AppJson;
use crate::models::participant::{
    CreateParticipantRequest, ParticipantDeleteResponse, ParticipantListResponse,
    ParticipantResponse, UpdateParticipantRequest, validate_code, validate_name, validate_phone,
};
use crate::models::upload::{UploadListResponse, UploadResponse};
use crate::state::AppState;
use crate::storage::cleanup;

#[utoipa::path(
    get,
    path = "/",
    tag = "Participants",
    operation_id = "listParticipants",
    summary = "List all participants",
    responses(
        (status = 200, description = "Participant list", body = ParticipantListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn list_participants(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ParticipantListResponse>, AppError> {
    let colleges: HashMap<i32, String> = college::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let models = participant::Entity::find()
        .order_by_asc(participant::Column::Code)
        .all(&state.db)
        .await?;

    let total = models.len() as u64;
    let participants = models
        .into_iter()
        .map(|p| {
            let college_name = colleges.get(&p.college_id).cloned().unwrap_or_default();
            ParticipantResponse::from_model(p, college_name)
        })
        .collect();

    Ok(Json(ParticipantListResponse {
        participants,
        total,
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Participants",
    operation_id = "createParticipant",
    summary = "Register a participant",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant created", body = ParticipantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Code already in use (PARTICIPANT_CODE_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, payload), fields(code = %payload.code))]
pub async fn create_participant(
    _session: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateParticipantRequest>,
) -> Result<impl IntoResponse, AppError> {
    let code = validate_code(&payload.code)?.to_string();
    let name = validate_name(&payload.name)?.to_string();
    let phone = validate_phone(&payload.phone)?.to_string();

    let owner = college::Entity::find_by_id(payload.college_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("College not found".into()))?;

    if find_by_code(&state.db, &code, None).await?.is_some() {
        return Err(AppError::ParticipantCodeTaken);
    }

    let model = participant::ActiveModel {
        code: Set(code),
        name: Set(name),
        phone: Set(phone),
        college_id: Set(owner.id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::ParticipantCodeTaken,
        _ => AppError::from(e),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse::from_model(created, owner.name)),
    ))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Participants",
    operation_id = "updateParticipant",
    summary = "Edit a participant",
    description = "Partially updates a participant. A new code is checked against all other \
        participants before the change is applied. The college cannot be changed; any \
        `college_id` in the payload is ignored.",
    params(("id" = i32, Path, description = "Participant ID")),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated", body = ParticipantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Participant not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Code already in use (PARTICIPANT_CODE_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, payload), fields(id))]
pub async fn update_participant(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateParticipantRequest>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let existing = find_participant(&state.db, id).await?;

    let mut active: participant::ActiveModel = existing.into();

    if let Some(ref code) = payload.code {
        let code = validate_code(code)?.to_string();
        if find_by_code(&state.db, &code, Some(id)).await?.is_some() {
            return Err(AppError::ParticipantCodeTaken);
        }
        active.code = Set(code);
    }
    if let Some(ref name) = payload.name {
        active.name = Set(validate_name(name)?.to_string());
    }
    if let Some(ref phone) = payload.phone {
        active.phone = Set(validate_phone(phone)?.to_string());
    }
    // payload.college_id is deliberately ignored: the college is fixed.

    let updated = active.update(&state.db).await?;

    let college_name = college::Entity::find_by_id(updated.college_id)
        .one(&state.db)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    Ok(Json(ParticipantResponse::from_model(updated, college_name)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Participants",
    operation_id = "deleteParticipant",
    summary = "Delete a participant and all their uploads",
    description = "Removes the participant's files from disk best-effort (canonical and legacy \
        locations), prunes emptied folders, then deletes the upload rows and the participant row \
        in one transaction. Disk failures never block the relational delete; the cleanup report \
        says what happened on disk.",
    params(("id" = i32, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Participant deleted", body = ParticipantDeleteResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Participant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session), fields(id))]
pub async fn delete_participant(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ParticipantDeleteResponse>, AppError> {
    let existing = find_participant(&state.db, id).await?;

    let stored_names: Vec<String> = file_upload::Entity::find()
        .filter(file_upload::Column::ParticipantId.eq(id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| u.stored_filename)
        .collect();

    // Disk first, store second: the store stays authoritative even when disk
    // cleanup partially fails.
    let cleanup =
        cleanup::remove_participant_tree(&state.storage, &existing.code, id, &stored_names).await;

    let txn = state.db.begin().await?;
    file_upload::Entity::delete_many()
        .filter(file_upload::Column::ParticipantId.eq(id))
        .exec(&txn)
        .await?;
    participant::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    state.release_upload_lock(id);

    Ok(Json(ParticipantDeleteResponse { id, cleanup }))
}

#[utoipa::path(
    get,
    path = "/{id}/uploads",
    tag = "Participants",
    operation_id = "listParticipantUploads",
    summary = "List a participant's uploads",
    params(("id" = i32, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Upload list", body = UploadListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Participant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session), fields(id))]
pub async fn list_participant_uploads(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UploadListResponse>, AppError> {
    let existing = find_participant(&state.db, id).await?;

    let models = file_upload::Entity::find()
        .filter(file_upload::Column::ParticipantId.eq(id))
        .order_by_asc(file_upload::Column::Id)
        .all(&state.db)
        .await?;

    let total = models.len() as u64;
    let uploads = models.into_iter().map(UploadResponse::from).collect();

    Ok(Json(UploadListResponse {
        uploads,
        total,
        folder: existing.code,
    }))
}

async fn find_participant<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<participant::Model, AppError> {
    participant::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Participant not found".into()))
}

/// Case-insensitive code lookup, optionally excluding one row (for edits).
async fn find_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<Option<participant::Model>, AppError> {
    let mut select = participant::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(participant::Column::Code))).eq(code.to_lowercase()),
    );
    if let Some(id) = exclude_id {
        select = select.filter(participant::Column::Id.ne(id));
    }
    Ok(select.one(db).await?)
}
