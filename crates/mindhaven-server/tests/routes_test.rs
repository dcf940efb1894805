//! HTTP-level tests for the chat endpoint

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use mindhaven_classifiers::{ClassificationResult, StateClassifier};
use mindhaven_core::{Result, Turn};
use mindhaven_llm::ChatClient;
use mindhaven_server::{create_router, AppState, ServerConfig};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedClassifier;

#[async_trait]
impl StateClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        ClassificationResult::from_probs(&[0.02, 0.03, 0.04, 0.87, 0.04])
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FixedClient;

#[async_trait]
impl ChatClient for FixedClient {
    async fn complete(&self, _turns: &[Turn]) -> Result<String> {
        Ok("Glad to hear it. What went well today?".to_string())
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

fn app() -> axum::Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state = AppState::new(
        ServerConfig::default(),
        Arc::new(FixedClassifier),
        Arc::new(FixedClient),
        handle,
    )
    .unwrap();
    create_router(state)
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn chat_returns_label_confidence_and_reply() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "I feel okay today"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["label"], "Normal");
    assert_eq!(json["confidence"], 87.0);
    assert!(!json["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn crisis_message_returns_hotline_over_http() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "I want to end my life"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["label"], "Crisis");
    assert_eq!(json["confidence"], 99.0);
    assert!(json["reply"].as_str().unwrap().contains("9152987821"));
}

#[tokio::test]
async fn empty_message_returns_400_with_error_envelope() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn session_id_keys_the_conversation() {
    let app = app();

    let response = app
        .clone()
        .oneshot(chat_request(
            r#"{"message": "hello there", "session_id": "alice"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(chat_request(r#"{"message": "hello again"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_hits_fallback() {
    let response = app()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Not found");
}
