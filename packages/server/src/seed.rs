use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::admin;
use crate::utils::hash;

/// Seed the default admin account if no admin row exists yet.
///
/// Runs on every startup; a no-op once any admin is present.
pub async fn seed_default_admin(db: &DatabaseConnection, auth: &AuthConfig) -> Result<(), DbErr> {
    let existing = admin::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    let password_hash = hash::hash_password(&auth.default_admin_password)
        .map_err(|e| DbErr::Custom(format!("Failed to hash default admin password: {e}")))?;

    let model = admin::ActiveModel {
        username: Set(auth.default_admin_username.clone()),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    let result = admin::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            info!(
                "Seeded default admin account '{}'",
                auth.default_admin_username
            );
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}
