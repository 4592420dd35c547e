use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for creating a college.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCollegeRequest {
    #[schema(example = "Northfield College")]
    pub name: String,
}

/// Request body for renaming a college.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateCollegeRequest {
    #[schema(example = "Northfield College of Arts")]
    pub name: String,
}

pub fn validate_college_name(name: &str) -> Result<&str, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 100 {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }
    Ok(trimmed)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Northfield College")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::college::Model> for CollegeResponse {
    fn from(model: crate::entity::college::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeListResponse {
    pub colleges: Vec<CollegeResponse>,
    #[schema(example = 12)]
    pub total: u64,
}
