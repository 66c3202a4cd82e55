//! Flow and contract verbs, plus the per-turn audit record.

use mc_domain::contract::AgentResponse;
use mc_domain::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::gateway::{json_text, SpanGateway};
use crate::span::{Span, SpanIntent, SpanResponse};
use crate::views::{hydrate, Flow};

/// A new flow (category of contracts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl FlowDraft {
    pub fn icon_or_default(&self) -> String {
        self.icon
            .clone()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(crate::views::d_icon)
    }
}

/// A contract to record in a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDraft {
    pub flow_id: String,
    /// Accepts a list or a comma-separated string.
    #[serde(deserialize_with = "names")]
    pub who: Vec<String>,
    pub did: String,
    #[serde(alias = "details")]
    pub this: Value,
    pub when: String,
    #[serde(default)]
    pub if_ok: Option<String>,
    #[serde(default)]
    pub if_not: Option<String>,
}

impl ContractDraft {
    /// `this` as prose: strings verbatim, anything else as JSON.
    pub fn this_text(&self) -> String {
        match &self.this {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Filters for a contract search. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

fn names<'de, D>(de: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Names::deserialize(de)? {
        Names::List(list) => list,
        Names::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
    })
}

impl SpanGateway {
    pub async fn create_flow(&self, flow: &FlowDraft) -> Result<SpanResponse> {
        let icon = flow.icon_or_default();
        let draft = Span::draft(SpanIntent::Install)
            .context(format!("Create flow: {}", flow.name))
            .response(json_text(&json!({
                "name": flow.name,
                "description": flow.description,
                "icon": flow.icon,
            })))
            .entity("flow")
            .field("name", flow.name.as_str())
            .field("description", flow.description.as_str())
            .field("icon", icon)
            .meta("type", "flow_created")
            .meta("flow_name", flow.name.as_str());
        self.dispatch(draft).await
    }

    pub async fn get_flows(&self) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Query)
            .context("Get all flows")
            .response(r#"{"status":"querying"}"#)
            .entity("flow")
            .meta("type", "flow_list");
        self.dispatch(draft).await
    }

    /// [`get_flows`](Self::get_flows), decoded.
    pub async fn list_flows(&self) -> Result<Vec<Flow>> {
        let resp = self.get_flows().await?;
        hydrate(&resp)
    }

    pub async fn register_contract(&self, contract: &ContractDraft) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Install)
            .context(format!(
                "Register contract in flow {}: {} {} {}",
                contract.flow_id,
                contract.who.join(", "),
                contract.did,
                contract.this_text()
            ))
            .response(json_text(&json!({
                "who": contract.who,
                "did": contract.did,
                "what": contract.this,
                "when": contract.when,
            })))
            .entity("contract")
            .field("flow_id", contract.flow_id.as_str())
            .field("who", contract.who.clone())
            .field("did", contract.did.as_str())
            .field("what", contract.this.clone())
            .field("when", contract.when.as_str())
            .field_opt("if_ok", contract.if_ok.clone())
            .field_opt("if_not", contract.if_not.clone())
            .meta("type", "contract_registered")
            .meta("flow_id", contract.flow_id.as_str())
            .meta("who", contract.who.clone());
        self.dispatch(draft).await
    }

    pub async fn search_contracts(&self, query: &ContractQuery) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Query)
            .context(format!("Search contracts: {}", json_text(&json!(query))))
            .response(r#"{"status":"searching"}"#)
            .entity("contract")
            .field_opt("flow_id", query.flow_id.clone())
            .field_opt("person", query.person.clone())
            .field_opt("date_from", query.date_from.clone())
            .field_opt("date_to", query.date_to.clone())
            .field_opt("keyword", query.keyword.clone())
            .meta("type", "contract_search");
        self.dispatch(draft).await
    }

    /// Audit one agent turn as an `llm_chat` span.
    pub async fn record_interaction(
        &self,
        message: &str,
        response: &AgentResponse,
    ) -> Result<SpanResponse> {
        let agent_response = serde_json::to_value(response)?;
        let draft = Span::draft(SpanIntent::LlmChat)
            .context(message)
            .response(json_text(&agent_response))
            .field("message", message)
            .field("agent_response", agent_response)
            .meta("type", "agent_interaction")
            .meta("trust_score", response.trust_score)
            .meta("tools_used", response.tools_used());
        self.dispatch(draft).await
    }
}
