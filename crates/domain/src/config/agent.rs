use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Agent dispatcher
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Upper bound on tool calls executed in a single turn.
    #[serde(default = "d_max_tool_calls")]
    pub max_tool_calls: usize,
    /// Write an `llm_chat` audit span after every agent turn.
    #[serde(default = "d_true")]
    pub record_interactions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_calls: d_max_tool_calls(),
            record_interactions: true,
        }
    }
}

fn d_max_tool_calls() -> usize {
    16
}
fn d_true() -> bool {
    true
}
