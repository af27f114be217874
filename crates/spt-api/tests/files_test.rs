mod helpers;

use axum::http::StatusCode;
use helpers::setup_test_app;
use spt_core::AccessLevel;

fn seed(app: &helpers::TestApp, dir: &str, name: &str, contents: &[u8]) {
    std::fs::write(app.purpose_dir(dir).join(name), contents).unwrap();
}

#[tokio::test]
async fn test_admin_downloads_stored_file() {
    let app = setup_test_app().await;
    seed(&app, "candidate", "cv2024-03-01-09-15-42.pdf", b"%PDF-1.7");
    let token = app.token(AccessLevel::Admin);

    let response = app
        .client()
        .get("/files/candidate/cv2024-03-01-09-15-42.pdf")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.7");
    assert_eq!(response.header("content-type"), "application/pdf");
}

#[tokio::test]
async fn test_anonymous_is_redirected_to_login() {
    let app = setup_test_app().await;
    seed(&app, "feedback", "notes.pdf", b"x");

    let response = app.client().get("/files/feedback/notes.pdf").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_insufficient_level_is_redirected_home() {
    let app = setup_test_app().await;
    seed(&app, "feedback", "notes.pdf", b"x");
    let token = app.token(AccessLevel::User);

    let response = app
        .client()
        .get("/files/feedback/notes.pdf")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let app = setup_test_app().await;
    std::fs::write(app.private_root().join("secret.pdf"), b"secret").unwrap();
    let token = app.token(AccessLevel::Admin);

    let response = app
        .client()
        .get("/files/candidate/..%2F..%2Fsecret.pdf")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let app = setup_test_app().await;
    let token = app.token(AccessLevel::Admin);

    let response = app
        .client()
        .get("/files/interviewQuestions/nope.pdf")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_purpose_is_404() {
    let app = setup_test_app().await;
    let token = app.token(AccessLevel::Admin);

    let response = app
        .client()
        .get("/files/payroll/x.pdf")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
