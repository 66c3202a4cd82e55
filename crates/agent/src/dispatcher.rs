//! One agent turn: ask the model, run the tools it asks for, normalize.
//!
//! ```text
//! START → AWAITING_MODEL ─┬─ stop_reason = tool_use → TOOL_DISPATCH → DONE
//!                         └─ otherwise              → DIRECT_ANSWER → DONE
//! ```

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use mc_domain::config::{AgentConfig, LlmConfig};
use mc_domain::contract::{AgentResponse, ContractStructure, ToolExecution};
use mc_domain::error::{Error, Result};
use mc_domain::tool::Message;
use mc_domain::trace::TraceEvent;
use mc_providers::{AnthropicProvider, ChatRequest, ChatResponse, LlmProvider};
use serde_json::Value;

use crate::executor::ToolExecutor;
use crate::prompts::SYSTEM_PROMPT;
use crate::tools::{tool_definitions, AgentToolCall};

const TOOL_TRUST: f64 = 1.0;
const DIRECT_TRUST: f64 = 0.8;
const TOOL_FALLBACK_TEXT: &str = "Action completed successfully";

/// Builds the provider for one turn from the resolved API key.
pub type ProviderFactory =
    Arc<dyn Fn(&LlmConfig, String) -> Result<Arc<dyn LlmProvider>> + Send + Sync>;

/// The default factory: a fresh Anthropic client per key.
pub fn anthropic_factory() -> ProviderFactory {
    Arc::new(|cfg: &LlmConfig, key: String| -> Result<Arc<dyn LlmProvider>> {
        let provider: Arc<dyn LlmProvider> = Arc::new(AnthropicProvider::from_config(cfg, key)?);
        Ok(provider)
    })
}

/// Drives agent turns. Cheap to clone; one per server.
#[derive(Clone)]
pub struct AgentDispatcher {
    llm: LlmConfig,
    /// Configured key, resolved once at construction.
    api_key: Option<String>,
    max_tool_calls: usize,
    providers: ProviderFactory,
    executor: Option<Arc<dyn ToolExecutor>>,
}

impl AgentDispatcher {
    pub fn new(llm: LlmConfig, agent: &AgentConfig) -> Self {
        Self {
            api_key: llm.resolve_api_key(),
            llm,
            max_tool_calls: agent.max_tool_calls,
            providers: anthropic_factory(),
            executor: None,
        }
    }

    pub fn with_provider_factory(mut self, providers: ProviderFactory) -> Self {
        self.providers = providers;
        self
    }

    /// Whether a server-side key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Same settings, tools run through `executor`.
    pub fn with_executor(&self, executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            executor: Some(executor),
            ..self.clone()
        }
    }

    /// Process one user message.
    ///
    /// `api_key` overrides the configured key. A missing key fails before
    /// any network call. Tool calls run one at a time in the order the model
    /// listed them; the first failure aborts the turn.
    pub async fn process_message(
        &self,
        user_message: &str,
        history: &[Message],
        model: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<AgentResponse> {
        let key = api_key
            .filter(|k| !k.trim().is_empty())
            .map(str::to_owned)
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                Error::Config(format!("{} not configured", self.llm.api_key_env))
            })?;

        let provider = (self.providers)(&self.llm, key)?;

        let mut messages = history.to_vec();
        messages.push(Message::user(user_message));

        let req = ChatRequest {
            system: Some(SYSTEM_PROMPT.to_owned()),
            messages,
            tools: tool_definitions(),
            temperature: Some(self.llm.temperature),
            max_tokens: Some(self.llm.max_tokens),
            model: Some(
                model
                    .filter(|m| !m.is_empty())
                    .unwrap_or(self.llm.default_model.as_str())
                    .to_owned(),
            ),
        };

        tracing::debug!(
            provider = provider.provider_id(),
            history = history.len(),
            "agent turn started"
        );

        let resp = provider.chat(req).await?;

        if resp.is_tool_use() {
            self.tool_dispatch(resp).await
        } else {
            Ok(direct_answer(resp))
        }
    }

    async fn tool_dispatch(&self, resp: ChatResponse) -> Result<AgentResponse> {
        if resp.tool_calls.len() > self.max_tool_calls {
            return Err(Error::ToolLimit {
                requested: resp.tool_calls.len(),
                limit: self.max_tool_calls,
            });
        }

        let calls = resp
            .tool_calls
            .iter()
            .map(|tc| AgentToolCall::parse(tc).map(|parsed| (tc, parsed)))
            .collect::<Result<Vec<_>>>()?;

        let executor = match (&self.executor, calls.is_empty()) {
            (_, true) => None,
            (Some(executor), false) => Some(executor),
            (None, false) => {
                return Err(Error::Config("no tool executor configured".into()));
            }
        };

        let mut results = Vec::with_capacity(calls.len());
        if let Some(executor) = executor {
            for (raw, call) in &calls {
                let outcome = executor.execute(call).await;

                TraceEvent::ToolExecuted {
                    tool_name: raw.tool_name.clone(),
                    call_id: raw.call_id.clone(),
                    ok: outcome.is_ok(),
                }
                .emit();

                let result = outcome.map_err(|e| {
                    tracing::warn!(tool = %raw.tool_name, call_id = %raw.call_id, error = %e, "tool failed");
                    e
                })?;
                results.push(ToolExecution {
                    tool_call_id: raw.call_id.clone(),
                    tool_name: raw.tool_name.clone(),
                    result,
                });
            }
        }

        let text = resp
            .first_text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| TOOL_FALLBACK_TEXT.to_owned());

        tracing::info!(tools = results.len(), "agent turn finished with tools");

        Ok(AgentResponse {
            understanding: text.clone(),
            contract: contract("tool_execution", text, "retry"),
            flows: Vec::new(),
            trust_score: TOOL_TRUST,
            needs_clarification: false,
            clarification_question: None,
            tool_results: Some(results),
        })
    }
}

fn direct_answer(resp: ChatResponse) -> AgentResponse {
    let text = resp.first_text.unwrap_or_default();
    tracing::info!(stop_reason = ?resp.stop_reason, "agent turn finished");
    AgentResponse {
        understanding: text.clone(),
        contract: contract("conversation", text, "clarify"),
        flows: Vec::new(),
        trust_score: DIRECT_TRUST,
        needs_clarification: false,
        clarification_question: None,
        tool_results: None,
    }
}

fn contract(did: &str, text: String, if_not: &str) -> ContractStructure {
    ContractStructure {
        who: Vec::new(),
        did: did.into(),
        this: Value::String(text),
        when: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        if_ok: "continue".into(),
        if_not: if_not.into(),
    }
}

impl std::fmt::Debug for AgentDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDispatcher")
            .field("default_model", &self.llm.default_model)
            .field("has_api_key", &self.api_key.is_some())
            .field("max_tool_calls", &self.max_tool_calls)
            .field("has_executor", &self.executor.is_some())
            .finish_non_exhaustive()
    }
}
