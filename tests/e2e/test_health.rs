use crate::e2e::helpers;

use helpers::{spawn_app, test_config, TestContext};
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_remote_backend_as_ready(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("status"), Some("ready"));
    assert_eq!(response.field("video_backend"), Some("did"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_health_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_incoming_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_header("/health", "x-request-id", "req-from-proxy-42")
        .await
        .unwrap();

    assert_eq!(
        response.header("x-request-id").map(String::as_str),
        Some("req-from-proxy-42")
    );
}

#[tokio::test]
async fn it_should_report_not_ready_without_wav2lip_checkpoint() {
    let work_dir = tempfile::tempdir().unwrap();
    let config = test_config(&[("VIDEO_BACKEND", "wav2lip".to_string())], &work_dir);
    let client = spawn_app(config).await;

    let response = client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.field("status"), Some("not_ready"));
    assert_eq!(response.field("video_backend"), Some("wav2lip"));
}

#[tokio::test]
async fn it_should_report_ready_with_fallback_wav2lip_checkpoint() {
    let work_dir = tempfile::tempdir().unwrap();
    std::fs::write(work_dir.path().join("wav2lip_gan.pth"), b"weights").unwrap();
    let config = test_config(&[("VIDEO_BACKEND", "wav2lip".to_string())], &work_dir);
    let client = spawn_app(config).await;

    let response = client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("status"), Some("ready"));
    assert!(response
        .field("checkpoint")
        .is_some_and(|checkpoint| checkpoint.ends_with("wav2lip_gan.pth")));
}
