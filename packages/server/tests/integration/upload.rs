use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

/// Spawn an app with one college and one logged-in participant.
async fn app_with_participant() -> (TestApp, String, i32) {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;
    let college_id = app.create_college(&admin, "Northfield College").await;
    let id = app
        .create_participant(&admin, "EV-042", "Dana", "5551234", college_id)
        .await;
    let token = app.login_participant("EV-042", "5551234").await;
    (app, token, id)
}

#[tokio::test]
async fn upload_lands_in_the_canonical_folder_and_is_recorded() {
    let (app, token, _) = app_with_participant().await;

    let res: TestResponse = app
        .upload_with_token("Stage Photo.JPG", b"jpegbytes".to_vec(), "image/jpeg", &token)
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["stored_filename"], "1.jpg");
    assert_eq!(res.body["original_filename"], "Stage Photo.JPG");
    assert_eq!(res.body["kind"], "image");

    let on_disk = app.uploads_root.join("EV-042/images/1.jpg");
    assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"jpegbytes");

    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 1);
    assert_eq!(res.body["folder"], "EV-042");
}

#[tokio::test]
async fn stored_names_are_sequential_and_never_reused() {
    let (app, token, _) = app_with_participant().await;

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", &token)
        .await;
    assert_eq!(res.body["stored_filename"], "1.jpg");
    let first_id = res.id();

    let res = app
        .upload_with_token("b.png", b"b".to_vec(), "image/png", &token)
        .await;
    assert_eq!(res.body["stored_filename"], "2.png");

    // Deleting an earlier upload leaves a gap; the index is not handed out
    // again.
    let res = app.delete_with_token(&routes::upload(first_id), &token).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app
        .upload_with_token("c.mp4", b"c".to_vec(), "video/mp4", &token)
        .await;
    assert_eq!(res.body["stored_filename"], "3.mp4");
    assert_eq!(res.body["kind"], "video");
}

#[tokio::test]
async fn non_image_content_types_are_classified_as_video() {
    let (app, token, _) = app_with_participant().await;

    let res = app
        .upload_with_token("clip.mov", b"movbytes".to_vec(), "video/quicktime", &token)
        .await;
    assert_eq!(res.body["kind"], "video");

    let res = app
        .upload_with_token("slides.pdf", b"pdfbytes".to_vec(), "application/pdf", &token)
        .await;
    assert_eq!(res.body["kind"], "video");
}

#[tokio::test]
async fn a_form_without_a_file_is_rejected() {
    let (app, token, _) = app_with_participant().await;

    // A multipart form that never carries a `file` field.
    let form = reqwest::multipart::Form::new().text("note", "hello");
    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::UPLOADS))
        .header("Authorization", format!("Bearer {token}"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let res = crate::common::TestResponse::from_response(res).await;
    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "NO_FILE_SELECTED");

    // Not multipart at all.
    let res = app.post_with_token(routes::UPLOADS, &json!({}), &token).await;
    assert_eq!(res.status, 400);

    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 0, "no row recorded for a rejected upload");
}

fn staging_leftovers(app: &TestApp) -> Vec<String> {
    std::fs::read_dir(&app.uploads_root)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".staging-"))
        .collect()
}

#[tokio::test]
async fn rejected_uploads_leave_no_staging_files_behind() {
    let (app, token, _) = app_with_participant().await;

    // A valid part followed by a second `file` part with an empty filename:
    // the request fails after the first part was already written to disk.
    let good = reqwest::multipart::Part::bytes(b"a".to_vec())
        .file_name("a.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let bad = reqwest::multipart::Part::bytes(b"b".to_vec())
        .file_name("")
        .mime_str("image/jpeg")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", good).part("file", bad);
    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::UPLOADS))
        .header("Authorization", format!("Bearer {token}"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let res = crate::common::TestResponse::from_response(res).await;
    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(staging_leftovers(&app), Vec::<String>::new());

    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn a_second_file_part_is_rejected_without_leftovers() {
    let (app, token, _) = app_with_participant().await;

    let first = reqwest::multipart::Part::bytes(b"a".to_vec())
        .file_name("a.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let second = reqwest::multipart::Part::bytes(b"b".to_vec())
        .file_name("b.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .part("file", first)
        .part("file", second);
    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::UPLOADS))
        .header("Authorization", format!("Bearer {token}"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let res = crate::common::TestResponse::from_response(res).await;
    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(staging_leftovers(&app), Vec::<String>::new());

    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 0, "nothing recorded from the rejected form");
}

#[tokio::test]
async fn owner_delete_removes_row_and_reports_disk_outcome() {
    let (app, token, _) = app_with_participant().await;

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", &token)
        .await;
    let upload_id = res.id();

    let res = app.delete_with_token(&routes::upload(upload_id), &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["removed_from_disk"], true);
    assert!(!app.uploads_root.join("EV-042/images/1.jpg").exists());

    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn delete_succeeds_even_when_the_file_is_already_gone() {
    let (app, token, _) = app_with_participant().await;

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", &token)
        .await;
    let upload_id = res.id();

    tokio::fs::remove_file(app.uploads_root.join("EV-042/images/1.jpg"))
        .await
        .unwrap();

    let res = app.delete_with_token(&routes::upload(upload_id), &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["removed_from_disk"], false);

    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 0, "store row removed regardless of disk");
}

#[tokio::test]
async fn admins_can_delete_any_upload() {
    let (app, token, id) = app_with_participant().await;
    let admin = app.login_admin().await;

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", &token)
        .await;
    let upload_id = res.id();

    let res = app.delete_with_token(&routes::upload(upload_id), &admin).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["removed_from_disk"], true);

    let res = app
        .get_with_token(&routes::participant_uploads(id), &admin)
        .await;
    assert_eq!(res.body["total"], 0);
}

#[tokio::test]
async fn participants_cannot_delete_each_others_uploads() {
    let (app, token, _) = app_with_participant().await;
    let admin = app.login_admin().await;
    let college_id = app.create_college(&admin, "Ashgrove Institute").await;
    app.create_participant(&admin, "EV-777", "Eli", "5550000", college_id)
        .await;
    let other = app.login_participant("EV-777", "5550000").await;

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", &token)
        .await;
    let upload_id = res.id();

    let res = app.delete_with_token(&routes::upload(upload_id), &other).await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "FORBIDDEN");

    // The upload survives.
    let res = app.get_with_token(routes::UPLOADS, &token).await;
    assert_eq!(res.body["total"], 1);
}

#[tokio::test]
async fn uploads_require_a_participant_session() {
    let app = TestApp::spawn().await;
    let admin = app.login_admin().await;

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", &admin)
        .await;
    assert_eq!(res.status, 401);

    let res = app
        .upload_with_token("a.jpg", b"a".to_vec(), "image/jpeg", "garbage")
        .await;
    assert_eq!(res.status, 401);

    let res = app.delete_without_token(&routes::upload(1)).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}
