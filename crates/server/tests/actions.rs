//! The action server end to end: real HTTP in, recorded LogLine traffic out.

use std::sync::Arc;

use async_trait::async_trait;
use mc_agent::{AgentDispatcher, ProviderFactory};
use mc_domain::config::{Config, LlmConfig};
use mc_domain::error::Result;
use mc_domain::tool::ToolCall;
use mc_logline::{RawResponse, Transport, TransportRequest};
use mc_providers::{ChatRequest, ChatResponse, LlmProvider};
use mc_server::{api, AppState};
use parking_lot::Mutex;
use serde_json::{json, Value};

// ── LogLine stand-in ────────────────────────────────────────────────────

#[derive(Default)]
struct LogLine {
    requests: Mutex<Vec<TransportRequest>>,
}

impl LogLine {
    fn count(&self) -> usize {
        self.requests.lock().len()
    }

    fn spans(&self) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| r.body.as_ref().map(|b| b["span"].clone()))
            .collect()
    }
}

#[async_trait]
impl Transport for LogLine {
    async fn send(&self, req: TransportRequest) -> Result<RawResponse> {
        let reply = answer(&req);
        self.requests.lock().push(req);
        Ok(reply)
    }
}

fn answer(req: &TransportRequest) -> RawResponse {
    let ok = |body: Value| RawResponse {
        status: 200,
        body: body.to_string(),
    };
    if req.path == "/auth/verify" {
        return ok(json!({ "email": "ana@acme.com" }));
    }
    let span = &req.body.as_ref().unwrap()["span"];
    let payload = &span["payload"];
    if payload["conversation_id"] == "missing" {
        return RawResponse {
            status: 404,
            body: "no such conversation".into(),
        };
    }
    match payload["entity_type"].as_str() {
        Some("folder") => ok(json!({ "span_id": "s-folder", "result": [{ "id": "f1", "name": "Vendas" }] })),
        Some("conversation") => ok(json!({ "span_id": "s-conv", "result": [{ "id": "c1", "title": "Pedidos" }] })),
        _ => ok(json!({ "span_id": format!("s-{}", span["intent"].as_str().unwrap_or("x")) })),
    }
}

// ── Scripted model ──────────────────────────────────────────────────────

struct Scripted;

#[async_trait]
impl LlmProvider for Scripted {
    async fn chat(&self, _req: ChatRequest) -> Result<ChatResponse> {
        Ok(ChatResponse {
            first_text: Some("Flow criado.".into()),
            content: "Flow criado.".into(),
            tool_calls: vec![ToolCall {
                call_id: "tu_1".into(),
                tool_name: "create_flow".into(),
                arguments: json!({ "name": "Vendas", "description": "Registros de vendas", "icon": "💰" }),
            }],
            stop_reason: Some("tool_use".into()),
            model: "claude-test".into(),
            usage: None,
        })
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}

// ── Harness ─────────────────────────────────────────────────────────────

struct Harness {
    base: String,
    logline: Arc<LogLine>,
    llm_keys: Arc<Mutex<Vec<String>>>,
    http: reqwest::Client,
}

async fn start(logline_key: Option<&str>) -> Harness {
    let mut config = Config::default();
    config.logline.api_key = logline_key.map(str::to_owned);
    config.logline.api_key_env = "MC_TEST_SERVER_LOGLINE_UNSET_77".into();
    config.llm.api_key = None;
    config.llm.api_key_env = "MC_TEST_SERVER_LLM_UNSET_77".into();
    let config = Arc::new(config);

    let llm_keys = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&llm_keys);
    let factory: ProviderFactory =
        Arc::new(move |_cfg: &LlmConfig, key: String| -> Result<Arc<dyn LlmProvider>> {
            seen.lock().push(key);
            Ok(Arc::new(Scripted))
        });
    let dispatcher =
        AgentDispatcher::new(config.llm.clone(), &config.agent).with_provider_factory(factory);

    let logline = Arc::new(LogLine::default());
    let state = AppState::new(config, logline.clone(), dispatcher);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(state)).await.unwrap();
    });

    Harness {
        base: format!("http://{addr}"),
        logline,
        llm_keys,
        http: reqwest::Client::new(),
    }
}

impl Harness {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_up() {
    let h = start(None).await;
    let body: Value = h.http.get(h.url("/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn caller_bearer_is_forwarded() {
    let h = start(Some("ll_server")).await;

    let resp = h
        .http
        .post(h.url("/v1/folders"))
        .bearer_auth("jwt-user")
        .json(&json!({ "name": "Vendas" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["id"], "f1");

    let auth = h.logline.requests.lock()[0].authorization.clone();
    assert_eq!(auth.as_deref(), Some("Bearer jwt-user"));
}

#[tokio::test]
async fn server_key_used_without_bearer() {
    let h = start(Some("ll_server")).await;
    h.http.get(h.url("/v1/folders")).send().await.unwrap();
    let auth = h.logline.requests.lock()[0].authorization.clone();
    assert_eq!(auth.as_deref(), Some("ApiKey ll_server"));
}

#[tokio::test]
async fn no_credential_means_no_traffic() {
    let h = start(None).await;

    let resp = h.http.get(h.url("/v1/conversations")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("unauthenticated"));
    assert!(body.get("data").is_none());
    assert_eq!(h.logline.count(), 0);
}

#[tokio::test]
async fn remote_404_becomes_failed_action() {
    let h = start(Some("ll_server")).await;

    let resp = h
        .http
        .delete(h.url("/v1/conversations/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn rename_and_clear_folder_of_conversation() {
    let h = start(Some("ll_server")).await;

    let body: Value = h
        .http
        .patch(h.url("/v1/conversations/c1"))
        .json(&json!({ "folder_id": null }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "success": true }));

    let span = &h.logline.spans()[0];
    assert_eq!(span["intent"], "update");
    assert!(span["payload"]["folder_id"].is_null());
    assert!(span["payload"].as_object().unwrap().contains_key("folder_id"));
}

#[tokio::test]
async fn send_message_reports_span_id() {
    let h = start(Some("ll_server")).await;

    let body: Value = h
        .http
        .post(h.url("/v1/messages"))
        .json(&json!({ "message": "oi", "conversation_id": "c1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["spanId"], "s-llm_chat");
    assert_eq!(h.logline.spans()[0]["metadata"]["trace_id"], "c1");
}

#[tokio::test]
async fn workspace_combines_both_queries() {
    let h = start(Some("ll_server")).await;

    let body: Value = h.http.get(h.url("/v1/workspace")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["data"]["folders"][0]["name"], "Vendas");
    assert_eq!(body["data"]["conversations"][0]["title"], "Pedidos");
    assert_eq!(h.logline.count(), 2);
}

#[tokio::test]
async fn agent_turn_runs_tools_and_audits() {
    let h = start(Some("ll_server")).await;

    let resp = h
        .http
        .post(h.url("/v1/agent/message"))
        .header("X-Anthropic-Key", "sk-user")
        .json(&json!({ "message": "cria um flow de vendas", "history": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    let data = &body["data"];
    assert_eq!(data["trust_score"], 1.0);
    assert_eq!(data["tool_results"][0]["toolCallId"], "tu_1");
    assert_eq!(data["tool_results"][0]["result"]["flow_id"], "s-install");
    assert_eq!(data["tool_results"][0]["result"]["icon"], "💰");

    assert_eq!(*h.llm_keys.lock(), vec!["sk-user".to_string()]);

    let spans = h.logline.spans();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0]["metadata"]["type"], "flow_created");
    assert_eq!(spans[1]["metadata"]["type"], "agent_interaction");
    assert_eq!(spans[1]["metadata"]["tools_used"], 1);
}

#[tokio::test]
async fn agent_turn_without_llm_key_fails_quietly() {
    let h = start(Some("ll_server")).await;

    let resp = h
        .http
        .post(h.url("/v1/agent/message"))
        .json(&json!({ "message": "oi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("MC_TEST_SERVER_LLM_UNSET_77"));
    assert!(h.llm_keys.lock().is_empty());
    assert_eq!(h.logline.count(), 0);
}

#[tokio::test]
async fn verify_returns_derived_identity() {
    let h = start(None).await;

    let body: Value = h
        .http
        .get(h.url("/v1/auth/verify?token=tok"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["email"], "ana@acme.com");
    assert_eq!(body["data"]["owner_id"], "ana");
    assert_eq!(body["data"]["tenant_id"], "acme");
    assert_eq!(body["data"]["token"], "tok");
}

#[tokio::test]
async fn unreadable_body_gets_the_envelope() {
    let h = start(Some("ll_server")).await;

    let resp = h
        .http
        .post(h.url("/v1/agent/message"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("message"));

    let resp = h
        .http
        .post(h.url("/v1/folders"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    assert!(h.llm_keys.lock().is_empty());
    assert_eq!(h.logline.count(), 0);
}

#[tokio::test]
async fn missing_query_field_gets_the_envelope() {
    let h = start(Some("ll_server")).await;

    let resp = h
        .http
        .get(h.url("/v1/conversations/search"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("q"));
    assert_eq!(h.logline.count(), 0);
}
