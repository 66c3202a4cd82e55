//! `AnthropicProvider` against an in-process Messages API stand-in.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use mc_domain::error::Error;
use mc_domain::tool::Message;
use mc_providers::{AnthropicProvider, ChatRequest, LlmProvider};
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn messages(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    stub.seen.lock().push((headers, body));
    (stub.status, Json(stub.reply.clone()))
}

async fn start(status: StatusCode, reply: Value) -> (String, Stub) {
    let stub = Stub {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1/messages", post(messages))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), stub)
}

fn request() -> ChatRequest {
    ChatRequest {
        system: Some("system".into()),
        messages: vec![Message::user("oi")],
        temperature: Some(0.7),
        max_tokens: Some(4096),
        ..Default::default()
    }
}

#[tokio::test]
async fn sends_anthropic_headers_and_parses_reply() {
    let (base, stub) = start(
        StatusCode::OK,
        json!({
            "model": "claude-test",
            "stop_reason": "end_turn",
            "content": [{"type": "text", "text": "Olá!"}]
        }),
    )
    .await;

    let provider = AnthropicProvider::new(&base, "sk-live", "claude-test", 5_000).unwrap();
    let resp = provider.chat(request()).await.unwrap();
    assert_eq!(resp.content, "Olá!");
    assert!(!resp.is_tool_use());

    let seen = stub.seen.lock();
    assert_eq!(seen.len(), 1);
    let (headers, body) = &seen[0];
    assert_eq!(headers["x-api-key"], "sk-live");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert_eq!(body["system"], "system");
    assert_eq!(body["messages"][0]["content"], "oi");
}

#[tokio::test]
async fn non_success_carries_status_and_body() {
    let (base, _stub) = start(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"type": "rate_limit_error"}}),
    )
    .await;

    let provider = AnthropicProvider::new(&base, "sk-live", "claude-test", 0).unwrap();
    let err = provider.chat(request()).await.unwrap_err();
    assert!(matches!(err, Error::Provider { .. }));
    let msg = err.to_string();
    assert!(msg.contains("429"));
    assert!(msg.contains("rate_limit_error"));
}

#[tokio::test]
async fn non_json_success_body_reads_as_empty_reply() {
    let app = Router::new().route("/v1/messages", post(|| async { "upstream hiccup" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let provider =
        AnthropicProvider::new(&format!("http://{addr}"), "sk-live", "claude-test", 0).unwrap();
    let resp = provider.chat(request()).await.unwrap();
    assert_eq!(resp.content, "");
    assert!(resp.first_text.is_none());
    assert!(resp.tool_calls.is_empty());
    assert!(!resp.is_tool_use());
}
