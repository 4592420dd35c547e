use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/colleges", college_routes())
        .nest("/participants", participant_routes())
        .nest("/uploads", upload_routes())
        .nest("/files", file_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::admin_login))
        .routes(routes!(handlers::auth::participant_login))
        .routes(routes!(handlers::auth::me))
}

fn college_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::college::list_colleges,
            handlers::college::create_college
        ))
        .routes(routes!(
            handlers::college::update_college,
            handlers::college::delete_college
        ))
}

fn participant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::participant::list_participants,
            handlers::participant::create_participant
        ))
        .routes(routes!(
            handlers::participant::update_participant,
            handlers::participant::delete_participant
        ))
        .routes(routes!(handlers::participant::list_participant_uploads))
}

fn upload_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::upload::list_my_uploads,
            handlers::upload::upload_file
        ))
        .routes(routes!(handlers::upload::delete_upload))
        .layer(handlers::upload::upload_body_limit())
}

fn file_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::files::get_file))
}
