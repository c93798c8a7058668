//! API endpoint integration tests
//!
//! Runs against an offline state (no STT/TTS/LLM configured): voice
//! endpoints report 503 and `/chat/text` exercises rule-only routing.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;
use vox_gateway::api::{self, CLARIFICATION_PROMPT};

mod common;
use common::offline_state;

fn app() -> axum::Router {
    api::router(offline_state())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_text(text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat/text")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "text": text }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn tools_endpoint_lists_capabilities() {
    let response = app()
        .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["calculate"].is_object());
    assert!(json["get_weather"].is_object());
    assert!(json["search_arxiv"].is_object());
    assert_eq!(json["search_arxiv"]["required"][0], "query");
}

#[tokio::test]
async fn chat_text_routes_spoken_math() {
    let response = app().oneshot(post_text("what is five plus three")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["reply"], "8");
}

#[tokio::test]
async fn chat_text_routes_symbolic_math() {
    let response = app().oneshot(post_text("10 to the power of 2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["reply"], "100");
}

#[tokio::test]
async fn chat_text_without_llm_or_rules_clarifies() {
    // No LLM configured and no rule matches: the pipeline ends empty, so
    // the fixed clarification prompt comes back
    let response = app().oneshot(post_text("tell me a story")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["reply"], CLARIFICATION_PROMPT);
}

#[tokio::test]
async fn chat_text_rejects_empty_text() {
    let response = app().oneshot(post_text("   ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn chat_requires_stt() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .body(Body::from(vec![0u8; 16]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_configured");
}

#[tokio::test]
async fn chat_debug_requires_stt() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat/debug")
                .body(Body::from(vec![0u8; 16]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
