use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_upload")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Sequential on-disk name, e.g. `3.jpg`. Unique only within the owning
    /// participant's folder; indices are never reused, so gaps appear after
    /// deletions.
    pub stored_filename: String,
    pub original_filename: String,

    /// One of: `image`, `video`.
    pub kind: String,

    pub participant_id: i32,
    #[sea_orm(belongs_to, from = "participant_id", to = "id")]
    pub participant: HasOne<super::participant::Entity>,

    pub uploaded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
