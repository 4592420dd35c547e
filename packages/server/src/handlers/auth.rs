use axum::{Json, extract::State};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{admin, college, participant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::SessionContext;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AdminLoginRequest, AdminLoginResponse, MeResponse, ParticipantLoginRequest,
    ParticipantLoginResponse, validate_admin_login_request, validate_participant_login_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Auth",
    operation_id = "adminLogin",
    summary = "Log in as an administrator",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AdminLoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    validate_admin_login_request(&payload)?;

    let username = payload.username.trim();

    let account = admin::Entity::find()
        .filter(admin::Column::Username.eq(username))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &account.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign_admin(account.id, &account.username, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token sign error: {}", e)))?;

    Ok(Json(AdminLoginResponse {
        token,
        username: account.username,
    }))
}

#[utoipa::path(
    post,
    path = "/participant/login",
    tag = "Auth",
    operation_id = "participantLogin",
    summary = "Log in as a participant",
    description = "Matches the registration code case-insensitively and the phone number exactly. \
        The participant's name and college are cached into the session token as of login time.",
    request_body = ParticipantLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ParticipantLoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(code = %payload.code))]
pub async fn participant_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ParticipantLoginRequest>,
) -> Result<Json<ParticipantLoginResponse>, AppError> {
    validate_participant_login_request(&payload)?;

    let code = payload.code.trim().to_lowercase();
    let phone = payload.phone.trim();

    let found = participant::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(participant::Column::Code))).eq(code))
        .filter(participant::Column::Phone.eq(phone))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let college_name = college::Entity::find_by_id(found.college_id)
        .one(&state.db)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    let token = jwt::sign_participant(
        found.id,
        &found.code,
        &found.name,
        &college_name,
        &state.config.auth.jwt_secret,
    )
    .map_err(|e| AppError::Internal(format!("Token sign error: {}", e)))?;

    Ok(Json(ParticipantLoginResponse {
        token,
        code: found.code,
        name: found.name,
        college_name,
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Return the current session context",
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(session))]
pub async fn me(session: SessionContext) -> Json<MeResponse> {
    let response = match session {
        SessionContext::Admin(admin) => MeResponse {
            kind: jwt::KIND_ADMIN.to_string(),
            id: admin.admin_id,
            name: admin.username,
            code: None,
            college_name: None,
        },
        SessionContext::Participant(p) => MeResponse {
            kind: jwt::KIND_PARTICIPANT.to_string(),
            id: p.participant_id,
            name: p.name,
            code: Some(p.code),
            college_name: Some(p.college_name),
        },
    };
    Json(response)
}
