//! Contract and agent-response shapes returned to callers.
//!
//! Wire names follow the front end: snake_case for the contract and agent
//! response, camelCase inside each tool execution record.

use serde::{Deserialize, Serialize};

/// A structured record of an agreement or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractStructure {
    /// Participants, in the order they were named.
    pub who: Vec<String>,
    pub did: String,
    /// Free-form details (items, amounts, ...).
    pub this: serde_json::Value,
    /// ISO-8601 timestamp.
    pub when: String,
    pub if_ok: String,
    pub if_not: String,
}

/// One executed tool call, in the order the model requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolExecution {
    pub tool_call_id: String,
    pub tool_name: String,
    pub result: serde_json::Value,
}

/// The normalized outcome of one agent turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub understanding: String,
    pub contract: ContractStructure,
    pub flows: Vec<String>,
    /// Heuristic confidence in `[0, 1]`; fixed per branch, never model-derived.
    pub trust_score: f64,
    pub needs_clarification: bool,
    pub clarification_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolExecution>>,
}

impl AgentResponse {
    /// Number of tools executed during the turn.
    pub fn tools_used(&self) -> usize {
        self.tool_results.as_ref().map_or(0, Vec::len)
    }
}
