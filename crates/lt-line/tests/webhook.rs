//! Webhook integration tests
//!
//! Drives the router with signed LINE payloads against stubbed vendor APIs.

use std::io::Cursor;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lt_core::Config;
use lt_line::LineBot;

const SECRET: &str = "channel-secret";

fn sign(body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

fn wav(frames: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn test_bot(server: &MockServer, static_dir: &std::path::Path) -> LineBot {
    let mut config = Config::default();
    config.line.channel_secret = SECRET.to_string();
    config.line.channel_access_token = "access-token".to_string();
    config.line.api_base_url = server.uri();
    config.server.static_dir = static_dir.display().to_string();
    config.deploy.url = "https://bot.example.com".to_string();
    config.translator.endpoint = server.uri();
    config.speech.endpoint = Some(server.uri());
    config.question_answering.endpoint = server.uri();
    LineBot::new(config).unwrap()
}

fn text_event(text: &str) -> String {
    json!({
        "destination": "Ubot",
        "events": [{
            "type": "message",
            "mode": "active",
            "timestamp": 1700000000000i64,
            "replyToken": "reply-token",
            "source": { "type": "user", "userId": "Uuser" },
            "message": { "id": "1", "type": "text", "text": text }
        }]
    })
    .to_string()
}

fn callback(body: String, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/callback")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-line-signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn mount_vendors(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_json(json!([{ "Text": "Where is the station?" }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "detectedLanguage": { "language": "en", "score": 1.0 },
            "translations": [
                { "text": "Where is the station?", "to": "en" },
                { "text": "車站在哪裡?", "to": "zh-Hant" },
                { "text": "駅はどこですか?", "to": "ja" },
                { "text": "역은 어디입니까?", "to": "ko" }
            ]
        }])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_json(json!([{ "Text": "車站在左邊" }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "detectedLanguage": { "language": "zh-Hant", "score": 1.0 },
            "translations": [
                { "text": "The station is on the left", "to": "en" },
                { "text": "車站在左邊", "to": "zh-Hant" },
                { "text": "駅は左です", "to": "ja" },
                { "text": "역은 왼쪽에 있습니다", "to": "ko" }
            ]
        }])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/transliterate"))
        .and(query_param("fromScript", "Hant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "text": "chē zhàn zài nǎ lǐ?", "script": "Latn" }
        ])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cognitiveservices/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav(40_000)))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/language/:query-knowledgebases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answers": [{ "answer": "車站在左邊", "confidenceScore": 0.92 }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_signed_message_gets_composed_reply() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_vendors(&server).await;

    Mock::given(method("POST"))
        .and(path("/bot/message/reply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let bot = test_bot(&server, dir.path());
    let body = text_event("Where is the station?");
    let signature = sign(&body);

    let response = bot
        .router()
        .oneshot(callback(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");

    let requests = server.received_requests().await.unwrap();
    let reply = requests
        .iter()
        .find(|r| r.url.path() == "/bot/message/reply")
        .expect("reply was sent");
    assert_eq!(
        reply.headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer access-token"
    );

    let payload: Value = serde_json::from_slice(&reply.body).unwrap();
    assert_eq!(
        payload,
        json!({
            "replyToken": "reply-token",
            "messages": [
                { "type": "text", "text": "中文\n車站在哪裡?\nchē zhàn zài nǎ lǐ?" },
                {
                    "type": "audio",
                    "originalContentUrl": "https://bot.example.com/static/outputaudio_hant.wav",
                    "duration": 2500
                },
                { "type": "text", "text": "The station is on the left" }
            ]
        })
    );

    assert!(dir.path().join("outputaudio_hant.wav").exists());
}

#[tokio::test]
async fn test_synthesized_audio_is_served() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("outputaudio_hant.wav"), wav(160)).unwrap();

    let bot = test_bot(&server, dir.path());
    let response = bot
        .router()
        .oneshot(
            Request::builder()
                .uri("/static/outputaudio_hant.wav")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.to_vec(), wav(160));
}

#[tokio::test]
async fn test_invalid_signature_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let bot = test_bot(&server, dir.path());

    let body = text_event("hello");
    let response = bot
        .router()
        .oneshot(callback(body, Some("bm90LWEtc2lnbmF0dXJl".to_string())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let bot = test_bot(&server, dir.path());

    let response = bot
        .router()
        .oneshot(callback(text_event("hello"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signed_garbage_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let bot = test_bot(&server, dir.path());

    let body = "not json".to_string();
    let signature = sign(&body);
    let response = bot
        .router()
        .oneshot(callback(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vendor_outage_still_acknowledges_webhook() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bot/message/reply"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let bot = test_bot(&server, dir.path());
    let body = text_event("hello");
    let signature = sign(&body);

    let response = bot
        .router()
        .oneshot(callback(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let bot = test_bot(&server, dir.path());

    let response = bot
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
