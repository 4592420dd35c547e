use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NO_FILE_SELECTED`,
    /// `TOKEN_MISSING`, `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `FORBIDDEN`,
    /// `NOT_FOUND`, `COLLEGE_NAME_TAKEN`, `PARTICIPANT_CODE_TAKEN`,
    /// `HAS_PARTICIPANTS`, `IO_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name must be 1-100 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Upload request carried no file part, or the part had an empty filename.
    NoFileSelected,
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    Forbidden,
    NotFound(String),
    CollegeNameTaken,
    ParticipantCodeTaken,
    /// A college still owns participants and cannot be deleted.
    HasParticipants,
    Io(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NoFileSelected => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "NO_FILE_SELECTED",
                    message: "No file selected".into(),
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid credentials".into(),
                },
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "FORBIDDEN",
                    message: "You do not have access to this resource".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::CollegeNameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "COLLEGE_NAME_TAKEN",
                    message: "A college with this name already exists".into(),
                },
            ),
            AppError::ParticipantCodeTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "PARTICIPANT_CODE_TAKEN",
                    message: "This participant code is already in use".into(),
                },
            ),
            AppError::HasParticipants => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "HAS_PARTICIPANTS",
                    message: "Cannot delete a college that still has participants".into(),
                },
            ),
            AppError::Io(detail) => {
                tracing::error!("I/O error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "IO_ERROR",
                        message: "A disk operation failed".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}
