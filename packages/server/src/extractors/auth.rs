use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Admin session extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require the admin login context.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin_id: i32,
    pub username: String,
}

/// Participant session extracted from the `Authorization: Bearer <token>`
/// header. Carries the fields cached at login time.
#[derive(Debug, Clone)]
pub struct ParticipantSession {
    pub participant_id: i32,
    pub code: String,
    pub name: String,
    pub college_name: String,
}

/// Either login context. Use where an operation is open to both admins and
/// participants (e.g. file retrieval, single-upload deletion).
#[derive(Debug, Clone)]
pub enum SessionContext {
    Admin(AdminSession),
    Participant(ParticipantSession),
}

fn claims_from_parts(parts: &Parts, secret: &str) -> Result<jwt::Claims, AppError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;

    jwt::verify(token, secret).map_err(|_| AppError::TokenInvalid)
}

fn admin_from_claims(claims: jwt::Claims) -> Result<AdminSession, AppError> {
    if claims.kind != jwt::KIND_ADMIN {
        return Err(AppError::TokenInvalid);
    }
    Ok(AdminSession {
        admin_id: claims.uid,
        username: claims.sub,
    })
}

fn participant_from_claims(claims: jwt::Claims) -> Result<ParticipantSession, AppError> {
    if claims.kind != jwt::KIND_PARTICIPANT {
        return Err(AppError::TokenInvalid);
    }
    Ok(ParticipantSession {
        participant_id: claims.uid,
        code: claims.sub,
        name: claims.name.unwrap_or_default(),
        college_name: claims.college.unwrap_or_default(),
    })
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, &state.config.auth.jwt_secret)?;
        admin_from_claims(claims)
    }
}

impl FromRequestParts<AppState> for ParticipantSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, &state.config.auth.jwt_secret)?;
        participant_from_claims(claims)
    }
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, &state.config.auth.jwt_secret)?;
        match claims.kind.as_str() {
            jwt::KIND_ADMIN => Ok(SessionContext::Admin(admin_from_claims(claims)?)),
            jwt::KIND_PARTICIPANT => {
                Ok(SessionContext::Participant(participant_from_claims(claims)?))
            }
            _ => Err(AppError::TokenInvalid),
        }
    }
}
