mod agent;
mod llm;
mod logline;
mod observability;
mod server;

pub use agent::*;
pub use llm::*;
pub use logline::*;
pub use observability::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logline: LogLineConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Resolve a secret: an inline value first, then the named env var.
/// Empty values count as unset.
pub(crate) fn resolve_secret(inline: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(key) = inline.filter(|k| !k.is_empty()) {
        tracing::warn!(
            "secret loaded from plaintext config field; prefer the *_env setting instead"
        );
        return Some(key.to_owned());
    }
    if env_var.is_empty() {
        return None;
    }
    std::env::var(env_var).ok().filter(|v| !v.is_empty())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good. Missing secrets are
    /// warnings: callers may still supply them per request.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.logline.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "logline.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if self.llm.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if !(0.0..=1.0).contains(&self.llm.temperature) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.temperature".into(),
                message: "temperature must be within 0.0..=1.0".into(),
            });
        }

        if self.llm.max_tokens == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "llm.max_tokens".into(),
                message: "max_tokens must be greater than 0".into(),
            });
        }

        if self.agent.max_tool_calls == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "agent.max_tool_calls".into(),
                message: "max_tool_calls must be greater than 0".into(),
            });
        }

        if self.logline.resolve_api_key().is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "logline.api_key".into(),
                message: format!(
                    "no LogLine API key (set {}); requests need a bearer token",
                    self.logline.api_key_env
                ),
            });
        }

        if self.llm.resolve_api_key().is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "llm.api_key".into(),
                message: format!(
                    "no LLM API key (set {}); requests must supply their own",
                    self.llm.api_key_env
                ),
            });
        }

        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "server.cors.allowed_origins".into(),
                message: "wildcard \"*\" allows all origins (not recommended for production)".into(),
            });
        }

        errors
    }
}
