//! The five agent tools: their schemas and their typed inputs.

use mc_domain::error::{Error, Result};
use mc_domain::tool::{ToolCall, ToolDefinition};
use mc_logline::{ContractDraft, ContractQuery, FlowDraft};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

pub const CREATE_FLOW: &str = "create_flow";
pub const REGISTER_CONTRACT: &str = "register_contract";
pub const SEARCH_CONTRACTS: &str = "search_contracts";
pub const GET_FLOWS: &str = "get_flows";
pub const RENDER_CHART: &str = "render_chart";

pub const TOOL_NAMES: [&str; 5] = [
    CREATE_FLOW,
    REGISTER_CONTRACT,
    SEARCH_CONTRACTS,
    GET_FLOWS,
    RENDER_CHART,
];

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool definitions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tool declarations sent with every completion request.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: CREATE_FLOW.into(),
            description: "Creates a new flow (category) for organizing contracts. \
                          Use when the user wants a new kind of record."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Flow name, e.g. 'Vendas' or 'Treinos'" },
                    "description": { "type": "string", "description": "What this flow tracks" },
                    "icon": { "type": "string", "description": "Emoji icon for the flow" }
                },
                "required": ["name", "description"]
            }),
        },
        ToolDefinition {
            name: REGISTER_CONTRACT.into(),
            description: "Registers a contract in a flow. Use when the user describes \
                          something that happened."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "flow_id": { "type": "string", "description": "Flow to register in" },
                    "who": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Everyone involved"
                    },
                    "did": { "type": "string", "description": "The action that happened" },
                    "this": { "type": "object", "description": "Details: items, amounts, quantities" },
                    "when": { "type": "string", "description": "When it happened (ISO 8601)" },
                    "if_ok": { "type": "string", "description": "What follows if the agreement is kept" },
                    "if_not": { "type": "string", "description": "What follows if it is not" }
                },
                "required": ["flow_id", "who", "did", "this", "when"]
            }),
        },
        ToolDefinition {
            name: SEARCH_CONTRACTS.into(),
            description: "Searches recorded contracts. Use when the user asks about past records."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "flow_id": { "type": "string", "description": "Flow to search; all flows when omitted" },
                    "person": { "type": "string", "description": "Filter by person" },
                    "date_from": { "type": "string", "description": "Start date (ISO 8601)" },
                    "date_to": { "type": "string", "description": "End date (ISO 8601)" },
                    "keyword": { "type": "string", "description": "Text to look for in contract details" }
                }
            }),
        },
        ToolDefinition {
            name: GET_FLOWS.into(),
            description: "Lists the user's flows. Use for questions like 'which flows do I have?'"
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: RENDER_CHART.into(),
            description: "Renders a chart from data points. Use when the user asks for a visualization."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "type": { "type": "string", "enum": ["bar", "line", "pie"], "description": "Chart type" },
                    "data": { "type": "array", "description": "Data points" },
                    "title": { "type": "string", "description": "Chart title" }
                },
                "required": ["type", "data", "title"]
            }),
        },
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Typed inputs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// Input of `render_chart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Accepts an array or a JSON string holding one.
    #[serde(deserialize_with = "data_points")]
    pub data: Vec<Value>,
    pub title: String,
}

fn data_points<'de, D>(de: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::Array(items) => Ok(items),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => Ok(items),
            _ => Err(serde::de::Error::custom("data string is not a JSON array")),
        },
        _ => Err(serde::de::Error::custom("data must be an array")),
    }
}

/// A tool call with its input parsed, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentToolCall {
    CreateFlow(FlowDraft),
    RegisterContract(ContractDraft),
    SearchContracts(ContractQuery),
    GetFlows,
    RenderChart(ChartSpec),
}

impl AgentToolCall {
    /// Parse a raw model tool call.
    pub fn parse(call: &ToolCall) -> Result<Self> {
        let name = call.tool_name.as_str();
        match name {
            CREATE_FLOW => input(name, &call.arguments).map(Self::CreateFlow),
            REGISTER_CONTRACT => input(name, &call.arguments).map(Self::RegisterContract),
            SEARCH_CONTRACTS => input(name, &call.arguments).map(Self::SearchContracts),
            GET_FLOWS => Ok(Self::GetFlows),
            RENDER_CHART => input(name, &call.arguments).map(Self::RenderChart),
            other => Err(Error::UnknownTool(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateFlow(_) => CREATE_FLOW,
            Self::RegisterContract(_) => REGISTER_CONTRACT,
            Self::SearchContracts(_) => SEARCH_CONTRACTS,
            Self::GetFlows => GET_FLOWS,
            Self::RenderChart(_) => RENDER_CHART,
        }
    }
}

fn input<T: serde::de::DeserializeOwned>(tool: &str, arguments: &Value) -> Result<T> {
    // Some models send `null` for a tool without arguments.
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidToolInput {
        tool: tool.to_owned(),
        message: e.to_string(),
    })
}
