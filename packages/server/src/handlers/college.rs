use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{college, participant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminSession;
use crate::extractors::json::AppJson;
use crate::models::college::{
    CollegeListResponse, CollegeResponse, CreateCollegeRequest, UpdateCollegeRequest,
    validate_college_name,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Colleges",
    operation_id = "listColleges",
    summary = "List all colleges",
    responses(
        (status = 200, description = "College list", body = CollegeListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session))]
pub async fn list_colleges(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<CollegeListResponse>, AppError> {
    let models = college::Entity::find()
        .order_by_asc(college::Column::Name)
        .all(&state.db)
        .await?;

    let total = models.len() as u64;
    let colleges = models.into_iter().map(CollegeResponse::from).collect();

    Ok(Json(CollegeListResponse { colleges, total }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Colleges",
    operation_id = "createCollege",
    summary = "Create a college",
    request_body = CreateCollegeRequest,
    responses(
        (status = 201, description = "College created", body = CollegeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Name already in use (COLLEGE_NAME_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, payload), fields(name = %payload.name))]
pub async fn create_college(
    _session: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCollegeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validate_college_name(&payload.name)?.to_string();

    if find_by_name(&state.db, &name, None).await?.is_some() {
        return Err(AppError::CollegeNameTaken);
    }

    let model = college::ActiveModel {
        name: Set(name),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::CollegeNameTaken,
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(CollegeResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Colleges",
    operation_id = "updateCollege",
    summary = "Rename a college",
    description = "Renames a college. The new name is checked against all other colleges before \
        the change is applied.",
    params(("id" = i32, Path, description = "College ID")),
    request_body = UpdateCollegeRequest,
    responses(
        (status = 200, description = "College updated", body = CollegeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already in use (COLLEGE_NAME_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session, payload), fields(id))]
pub async fn update_college(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCollegeRequest>,
) -> Result<Json<CollegeResponse>, AppError> {
    let name = validate_college_name(&payload.name)?.to_string();

    let existing = find_college(&state.db, id).await?;

    if find_by_name(&state.db, &name, Some(id)).await?.is_some() {
        return Err(AppError::CollegeNameTaken);
    }

    let mut active: college::ActiveModel = existing.into();
    active.name = Set(name);
    let updated = active.update(&state.db).await?;

    Ok(Json(CollegeResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Colleges",
    operation_id = "deleteCollege",
    summary = "Delete a college",
    description = "Deletes a college. Refused while any participant still references it.",
    params(("id" = i32, Path, description = "College ID")),
    responses(
        (status = 204, description = "College deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "College still has participants (HAS_PARTICIPANTS)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _session), fields(id))]
pub async fn delete_college(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_college(&state.db, id).await?;

    let members = participant::Entity::find()
        .filter(participant::Column::CollegeId.eq(id))
        .count(&state.db)
        .await?;
    if members > 0 {
        return Err(AppError::HasParticipants);
    }

    college::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_college<C: ConnectionTrait>(db: &C, id: i32) -> Result<college::Model, AppError> {
    college::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("College not found".into()))
}

/// Case-insensitive name lookup, optionally excluding one row (for edits).
async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<Option<college::Model>, AppError> {
    let mut select = college::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(college::Column::Name))).eq(name.to_lowercase()));
    if let Some(id) = exclude_id {
        select = select.filter(college::Column::Id.ne(id));
    }
    Ok(select.one(db).await?)
}
