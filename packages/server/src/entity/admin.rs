use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrator account. Seeded once at bootstrap; there is no admin
/// self-service registration.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
}

impl ActiveModelBehavior for ActiveModel {}
