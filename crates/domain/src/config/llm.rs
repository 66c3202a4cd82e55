use serde::{Deserialize, Serialize};

use super::resolve_secret;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider (Anthropic Messages API)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "d_llm_url")]
    pub base_url: String,
    /// Server-side default key. A per-request key overrides it.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "d_llm_key_env")]
    pub api_key_env: String,
    #[serde(default = "d_model")]
    pub default_model: String,
    #[serde(default = "d_4096")]
    pub max_tokens: u32,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    /// Request timeout; `0` disables it.
    #[serde(default)]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_llm_url(),
            api_key: None,
            api_key_env: d_llm_key_env(),
            default_model: d_model(),
            max_tokens: 4096,
            temperature: d_temperature(),
            timeout_ms: 0,
        }
    }
}

impl LlmConfig {
    /// The server-side key from config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_deref(), &self.api_key_env)
    }
}

fn d_llm_url() -> String {
    "https://api.anthropic.com".into()
}
fn d_llm_key_env() -> String {
    "ANTHROPIC_API_KEY".into()
}
fn d_model() -> String {
    "claude-3-5-sonnet-20241022".into()
}
fn d_4096() -> u32 {
    4096
}
fn d_temperature() -> f32 {
    0.7
}
