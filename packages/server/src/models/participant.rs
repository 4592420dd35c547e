use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::storage::paths::safe_component;

/// Request body for registering a participant.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateParticipantRequest {
    /// Human-facing registration code, also used as the upload folder name.
    #[schema(example = "EV-042")]
    pub code: String,
    #[schema(example = "Dana Whitfield")]
    pub name: String,
    #[schema(example = "5551234")]
    pub phone: String,
    #[schema(example = 3)]
    pub college_id: i32,
}

/// Request body for editing a participant. All fields optional; `college_id`
/// is accepted but ignored, since a participant's college is fixed at
/// creation.
#[derive(Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateParticipantRequest {
    #[schema(example = "EV-043")]
    pub code: Option<String>,
    #[schema(example = "Dana Whitfield")]
    pub name: Option<String>,
    #[schema(example = "5554321")]
    pub phone: Option<String>,
    /// Ignored. Present so older clients that send it still validate.
    pub college_id: Option<i32>,
}

/// A participant code becomes an on-disk folder name, so it must be a safe
/// single path component on top of the usual length limits.
pub fn validate_code(code: &str) -> Result<&str, AppError> {
    let trimmed = safe_component(code).map_err(|e| AppError::Validation(e.message().into()))?;
    if trimmed.chars().count() > 50 {
        return Err(AppError::Validation("Code must be 1-50 characters".into()));
    }
    Ok(trimmed)
}

pub fn validate_name(name: &str) -> Result<&str, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 100 {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }
    Ok(trimmed)
}

pub fn validate_phone(phone: &str) -> Result<&str, AppError> {
    let trimmed = phone.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 20 {
        return Err(AppError::Validation("Phone must be 1-20 characters".into()));
    }
    Ok(trimmed)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipantResponse {
    #[schema(example = 17)]
    pub id: i32,
    #[schema(example = "EV-042")]
    pub code: String,
    #[schema(example = "Dana Whitfield")]
    pub name: String,
    #[schema(example = "5551234")]
    pub phone: String,
    #[schema(example = 3)]
    pub college_id: i32,
    #[schema(example = "Northfield College")]
    pub college_name: String,
    pub created_at: DateTime<Utc>,
}

impl ParticipantResponse {
    pub fn from_model(model: crate::entity::participant::Model, college_name: String) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            phone: model.phone,
            college_id: model.college_id,
            college_name,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipantListResponse {
    pub participants: Vec<ParticipantResponse>,
    #[schema(example = 40)]
    pub total: u64,
}

/// Returned by participant deletion: the relational rows are gone and the
/// disk cleanup outcome is reported rather than hidden.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipantDeleteResponse {
    #[schema(example = 17)]
    pub id: i32,
    pub cleanup: crate::storage::cleanup::CleanupReport,
}
