use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin123")]
    pub password: String,
}

pub fn validate_admin_login_request(payload: &AdminLoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Request body for participant login. The code is matched
/// case-insensitively; the phone number must match exactly.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ParticipantLoginRequest {
    #[schema(example = "EV-042")]
    pub code: String,
    #[schema(example = "5551234")]
    pub phone: String,
}

pub fn validate_participant_login_request(payload: &ParticipantLoginRequest) -> Result<(), AppError> {
    if payload.code.trim().is_empty() {
        return Err(AppError::Validation(
            "Participant code must not be empty".into(),
        ));
    }
    if payload.phone.trim().is_empty() {
        return Err(AppError::Validation("Phone must not be empty".into()));
    }
    Ok(())
}

/// Successful admin login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    /// Session token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "admin")]
    pub username: String,
}

/// Successful participant login response. Name and college are cached into
/// the session token as of login time.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipantLoginResponse {
    /// Session token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "EV-042")]
    pub code: String,
    #[schema(example = "Dana Whitfield")]
    pub name: String,
    #[schema(example = "Northfield College")]
    pub college_name: String,
}

/// Current session context.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// `admin` or `participant`.
    #[schema(example = "participant")]
    pub kind: String,
    /// Admin or participant row id.
    #[schema(example = 17)]
    pub id: i32,
    /// Admin username or participant display name.
    #[schema(example = "Dana Whitfield")]
    pub name: String,
    /// Participant code; absent for admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Participant's college name; absent for admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
}
