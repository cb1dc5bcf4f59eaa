use crate::e2e::helpers;

use helpers::api_client::FormPart;
use helpers::{TestContext, ENGLISH_NEWS, TALK_ID};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

fn news_form(text: &str) -> Vec<FormPart> {
    vec![FormPart::text("text", text), FormPart::jpeg_face()]
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_video_url_when_talk_completes(ctx: &TestContext) {
    ctx.mock_tts_ok().await;
    ctx.mock_did_job_created().await;
    ctx.mock_did_status(json!({
        "id": TALK_ID,
        "status": "done",
        "result_url": "https://cdn.d-id.com/talks/tlk_e2e.mp4"
    }))
    .await;

    let response = ctx
        .client
        .post_form("/api/videos", &news_form(ENGLISH_NEWS))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.field("video_url"),
        Some("https://cdn.d-id.com/talks/tlk_e2e.mp4")
    );
    assert_eq!(response.field("language"), Some("en"));
    assert_eq!(response.field("backend"), Some("did"));
    assert_eq!(ctx.did_status_polls().await, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_female_voice_when_requested(ctx: &TestContext) {
    ctx.mock_tts_ok().await;
    ctx.mock_did_job_created().await;
    ctx.mock_did_status(json!({ "status": "done", "result_url": "https://cdn/v.mp4" }))
        .await;

    let mut form = news_form(ENGLISH_NEWS);
    form.push(FormPart::text("voice", "female"));
    let response = ctx.client.post_form("/api/videos", &form).await.unwrap();

    response.assert_status(StatusCode::OK);
    let requests = ctx.elevenlabs.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        format!("/v1/text-to-speech/{}", ctx.config.elevenlabs_female_voice_id)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_bad_gateway_when_talk_fails(ctx: &TestContext) {
    ctx.mock_tts_ok().await;
    ctx.mock_did_job_created().await;
    ctx.mock_did_status(json!({
        "id": TALK_ID,
        "status": "failed",
        "error": { "kind": "FaceError", "description": "no face detected" }
    }))
    .await;

    let response = ctx
        .client
        .post_form("/api/videos", &news_form(ENGLISH_NEWS))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("no face detected");
    assert_eq!(ctx.did_status_polls().await, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_time_out_after_max_attempts(ctx: &TestContext) {
    ctx.mock_tts_ok().await;
    ctx.mock_did_job_created().await;
    ctx.mock_did_status(json!({ "id": TALK_ID, "status": "started" }))
        .await;

    let response = ctx
        .client
        .post_form("/api/videos", &news_form(ENGLISH_NEWS))
        .await
        .unwrap();

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        ctx.did_status_polls().await,
        ctx.config.video_poll_max_attempts as usize
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_bad_gateway_when_synthesis_fails(ctx: &TestContext) {
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&ctx.elevenlabs)
        .await;
    ctx.mock_did_job_created().await;

    let response = ctx
        .client
        .post_form("/api/videos", &news_form(ENGLISH_NEWS))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(ctx.did_requests().await, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_without_detectable_language(ctx: &TestContext) {
    ctx.mock_tts_ok().await;

    let response = ctx
        .client
        .post_form("/api/videos", &news_form("2024 -- 12345 / 678"))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(ctx.elevenlabs.received_requests().await.unwrap().is_empty());
    assert_eq!(ctx.did_requests().await, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_news_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/api/videos", &news_form("   "))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Please enter news content");
    assert!(ctx.elevenlabs.received_requests().await.unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_face_image(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/api/videos", &[FormPart::text("text", ENGLISH_NEWS)])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Please upload a face image");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_image_type(ctx: &TestContext) {
    let form = vec![
        FormPart::text("text", ENGLISH_NEWS),
        FormPart::file("face", "anchor.gif", "image/gif", b"GIF89a".to_vec()),
    ];

    let response = ctx.client.post_form("/api/videos", &form).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("JPG or PNG");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_voice(ctx: &TestContext) {
    let mut form = news_form(ENGLISH_NEWS);
    form.push(FormPart::text("voice", "robot"));

    let response = ctx.client.post_form("/api/videos", &form).await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_oversized_text(ctx: &TestContext) {
    let text = "a".repeat(10_001);

    let response = ctx
        .client
        .post_form("/api/videos", &news_form(&text))
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_serve_leftover_local_video_for_remote_backend(ctx: &TestContext) {
    let results = ctx.work_dir.path().join("results");
    std::fs::create_dir_all(&results).unwrap();
    std::fs::write(results.join("result_voice.mp4"), b"stale").unwrap();

    let response = ctx.client.get("/api/videos/download").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("only available for locally rendered videos");
}

#[tokio::test]
async fn it_should_return_not_found_before_any_local_video() {
    use helpers::{spawn_app, test_config};

    let work_dir = tempfile::tempdir().unwrap();
    let config = test_config(&[("VIDEO_BACKEND", "wav2lip".to_string())], &work_dir);
    let client = spawn_app(config).await;

    let response = client.get("/api/videos/download").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("No video has been generated yet");
}

#[cfg(unix)]
#[tokio::test]
async fn it_should_render_locally_and_serve_download() {
    use helpers::{spawn_app, test_config};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let elevenlabs = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x49u8, 0x44, 0x33]))
        .mount(&elevenlabs)
        .await;

    // `sh inference.sh --checkpoint_path C --face F --audio A --outfile O`
    let work_dir = tempfile::tempdir().unwrap();
    std::fs::write(work_dir.path().join("wav2lip_gan.pth"), b"weights").unwrap();
    std::fs::write(work_dir.path().join("inference.sh"), "printf rendered > \"$8\"\n").unwrap();

    let config = test_config(
        &[
            ("ELEVENLABS_BASE_URL", elevenlabs.uri()),
            ("VIDEO_BACKEND", "wav2lip".to_string()),
            ("WAV2LIP_PYTHON", "sh".to_string()),
            ("WAV2LIP_SCRIPT", "inference.sh".to_string()),
        ],
        &work_dir,
    );
    let client = spawn_app(config).await;

    let response = client
        .post_form("/api/videos", &news_form(ENGLISH_NEWS))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("video_url"), Some("/api/videos/download"));
    assert_eq!(response.field("backend"), Some("wav2lip"));
    assert!(work_dir.path().join("input_face.jpg").is_file());

    let download = client.get("/api/videos/download").await.unwrap();

    download.assert_status(StatusCode::OK);
    assert_eq!(
        download.header("content-type").map(String::as_str),
        Some("video/mp4")
    );
    assert_eq!(
        download.header("content-disposition").map(String::as_str),
        Some("attachment; filename=\"AI_News.mp4\"")
    );
    assert_eq!(download.body_bytes, b"rendered");
}
