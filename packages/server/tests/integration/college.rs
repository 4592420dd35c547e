use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn admin_can_create_and_list_colleges() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;

    let res = app
        .post_with_token(routes::COLLEGES, &json!({"name": "Northfield College"}), &admin)
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["name"], "Northfield College");

    app.create_college(&admin, "Ashgrove Institute").await;

    let res = app.get_with_token(routes::COLLEGES, &admin).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["total"], 2);
}

#[tokio::test]
async fn duplicate_name_is_refused() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;
    app.create_college(&admin, "Northfield College").await;

    let res = app
        .post_with_token(routes::COLLEGES, &json!({"name": "Northfield College"}), &admin)
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "COLLEGE_NAME_TAKEN");
}

#[tokio::test]
async fn empty_name_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;

    let res = app
        .post_with_token(routes::COLLEGES, &json!({"name": "   "}), &admin)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rename_checks_against_other_colleges_only() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;
    let first = app.create_college(&admin, "Northfield College").await;
    app.create_college(&admin, "Ashgrove Institute").await;

    // Renaming to its own name is fine.
    let res = app
        .patch_with_token(
            &routes::college(first),
            &json!({"name": "Northfield College"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    // Renaming onto another college's name is not.
    let res = app
        .patch_with_token(
            &routes::college(first),
            &json!({"name": "Ashgrove Institute"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "COLLEGE_NAME_TAKEN");
}

#[tokio::test]
async fn deleting_an_empty_college_succeeds() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;
    let id = app.create_college(&admin, "Northfield College").await;

    let res = app.delete_with_token(&routes::college(id), &admin).await;
    assert_eq!(res.status, 204);

    let res = app.get_with_token(routes::COLLEGES, &admin).await;
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn deleting_a_college_with_participants_is_refused() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;
    let id = app.create_college(&admin, "Northfield College").await;
    app.create_participant(&admin, "EV-042", "Dana", "5551234", id)
        .await;

    let res = app.delete_with_token(&routes::college(id), &admin).await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "HAS_PARTICIPANTS");

    // College and participant are both intact.
    let res = app.get_with_token(routes::COLLEGES, &admin).await;
    assert_eq!(res.body["total"], 1);
    let res = app.get_with_token(routes::PARTICIPANTS, &admin).await;
    assert_eq!(res.body["total"], 1);
}

#[tokio::test]
async fn unknown_college_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;

    let res = app.delete_with_token(&routes::college(999), &admin).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn anonymous_callers_cannot_mutate() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::COLLEGES, &json!({"name": "Northfield College"}))
        .await;
    assert_eq!(res.status, 401);

    let admin = app.login_admin().await;
    let res = app.get_with_token(routes::COLLEGES, &admin).await;
    assert_eq!(res.body["total"], 0, "no state change from anonymous call");
}
