use serde::{Deserialize, Serialize};

use super::resolve_secret;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogLine connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLineConfig {
    #[serde(default = "d_logline_url")]
    pub base_url: String,
    /// Static API key. Prefer `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    #[serde(default = "d_logline_key_env")]
    pub api_key_env: String,
    /// Append `?wait=true` so LogLine answers after the span is committed.
    #[serde(default = "d_true")]
    pub wait: bool,
    /// Request timeout; `0` disables it.
    #[serde(default)]
    pub timeout_ms: u64,
    /// Value stamped into `metadata.app` on every span.
    #[serde(default = "d_app")]
    pub app: String,
}

impl Default for LogLineConfig {
    fn default() -> Self {
        Self {
            base_url: d_logline_url(),
            api_key: None,
            api_key_env: d_logline_key_env(),
            wait: true,
            timeout_ms: 0,
            app: d_app(),
        }
    }
}

impl LogLineConfig {
    /// The static API key from config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Settings for the external sign-in front end. Carried for the
/// redirect flow, which lives outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub frontend_url: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
}

// ── serde default helpers ───────────────────────────────────────────

fn d_logline_url() -> String {
    "https://api.logline.world".into()
}
fn d_logline_key_env() -> String {
    "LOGLINE_API_KEY".into()
}
fn d_true() -> bool {
    true
}
fn d_app() -> String {
    "minicontratos".into()
}
