use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = 9)]
    pub id: i32,
    /// Sequential on-disk name within the participant's folder.
    #[schema(example = "3.jpg")]
    pub stored_filename: String,
    #[schema(example = "stage-photo.JPG")]
    pub original_filename: String,
    /// `image` or `video`.
    #[schema(example = "image")]
    pub kind: String,
    #[schema(example = 17)]
    pub participant_id: i32,
    pub uploaded_at: DateTime<Utc>,
}

impl From<crate::entity::file_upload::Model> for UploadResponse {
    fn from(model: crate::entity::file_upload::Model) -> Self {
        Self {
            id: model.id,
            stored_filename: model.stored_filename,
            original_filename: model.original_filename,
            kind: model.kind,
            participant_id: model.participant_id,
            uploaded_at: model.uploaded_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadListResponse {
    pub uploads: Vec<UploadResponse>,
    #[schema(example = 5)]
    pub total: u64,
    /// Folder key clients should use with the file retrieval endpoint.
    #[schema(example = "EV-042")]
    pub folder: String,
}

/// Returned by single-upload deletion. The store row is always removed; the
/// flag reports whether a file was actually found and removed on disk.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadDeleteResponse {
    #[schema(example = 9)]
    pub id: i32,
    #[schema(example = true)]
    pub removed_from_disk: bool,
}
