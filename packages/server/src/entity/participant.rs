use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-facing registration code. Unique, matched case-insensitively at
    /// login, and used as the on-disk folder name for this participant's files.
    #[sea_orm(unique)]
    pub code: String,

    pub name: String,
    pub phone: String,

    /// Fixed at creation; edits never move a participant to another college.
    pub college_id: i32,
    #[sea_orm(belongs_to, from = "college_id", to = "id")]
    pub college: HasOne<super::college::Entity>,

    #[sea_orm(has_many)]
    pub uploads: HasMany<super::file_upload::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
