//! Shared helpers for driving the router in-process.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use iims::config::Config;
use tower::ServiceExt;

pub async fn spawn_app() -> Router {
    let (app, _uploads) = spawn_app_with_uploads_path().await;
    app
}

/// Variant exposing the upload directory, for tests that poke at stored
/// files directly.
pub async fn spawn_app_with_uploads_path() -> (Router, std::path::PathBuf) {
    let run_id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("iims-test-{run_id}.db"));
    let uploads_path = std::env::temp_dir().join(format!("iims-test-uploads-{run_id}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.uploads.path = uploads_path.display().to_string();
    config.server.secure_cookies = false;

    let state = iims::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    (iims::api::router(state).await, uploads_path)
}

/// Registers a fresh account and returns its session cookie.
pub async fn register_and_login(app: &Router, username: &str, badge: i32) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header(
                    header::CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(Body::from(format!(
                    "new_username={username}&new_password=secret-pass&new_badge={badge}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response)
}

pub fn session_cookie<B>(response: &Response<B>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn location<B>(response: &Response<B>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub const BOUNDARY: &str = "----iims-test-boundary";

/// Builds a multipart/form-data body from text fields plus an optional
/// evidence file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((filename, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"evidence_file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// POSTs a record-creation form with the given overrides and returns the
/// response.
pub async fn create_inmate(
    app: &Router,
    cookie: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/dashboard")
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, multipart_content_type())
                .body(Body::from(multipart_body(fields, file)))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn dashboard_json(app: &Router, cookie: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/dashboard")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
