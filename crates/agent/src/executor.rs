//! Runs parsed tool calls against LogLine.

use async_trait::async_trait;
use mc_domain::error::Result;
use mc_logline::SpanGateway;
use serde_json::{json, Value};

use crate::tools::{AgentToolCall, ChartSpec};

/// Executes one tool call and returns its JSON result.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, call: &AgentToolCall) -> Result<Value>;
}

/// The production executor: every tool except `render_chart` writes or
/// queries one span.
#[derive(Debug, Clone)]
pub struct LogLineToolExecutor {
    gateway: SpanGateway,
}

impl LogLineToolExecutor {
    pub fn new(gateway: SpanGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ToolExecutor for LogLineToolExecutor {
    async fn execute(&self, call: &AgentToolCall) -> Result<Value> {
        match call {
            AgentToolCall::CreateFlow(flow) => {
                let resp = self.gateway.create_flow(flow).await?;
                Ok(json!({
                    "success": true,
                    "flow_id": resp.span_id,
                    "name": flow.name,
                    "description": flow.description,
                    "icon": flow.icon_or_default(),
                }))
            }
            AgentToolCall::RegisterContract(contract) => {
                let resp = self.gateway.register_contract(contract).await?;
                Ok(json!({
                    "success": true,
                    "contract_id": resp.span_id,
                    "flow_id": contract.flow_id,
                    "who": contract.who,
                    "did": contract.did,
                    "what": contract.this,
                    "when": contract.when,
                }))
            }
            AgentToolCall::SearchContracts(query) => {
                let resp = self.gateway.search_contracts(query).await?;
                Ok(json!({
                    "success": true,
                    "contracts": resp.result_items(),
                }))
            }
            AgentToolCall::GetFlows => {
                let resp = self.gateway.get_flows().await?;
                Ok(json!({
                    "success": true,
                    "flows": resp.result_items(),
                }))
            }
            AgentToolCall::RenderChart(chart) => Ok(render_chart(chart)),
        }
    }
}

/// Chart payload for the front end. No network.
pub fn render_chart(chart: &ChartSpec) -> Value {
    json!({
        "success": true,
        "chart": {
            "type": chart.kind,
            "title": chart.title,
            "data": chart.data,
        },
        "message": "Chart data ready for rendering",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ChartKind;

    #[test]
    fn chart_echoes_input() {
        let v = render_chart(&ChartSpec {
            kind: ChartKind::Bar,
            data: vec![json!({"label": "jan", "value": 3})],
            title: "Vendas".into(),
        });
        assert_eq!(v["success"], true);
        assert_eq!(v["chart"]["type"], "bar");
        assert_eq!(v["chart"]["data"][0]["value"], 3);
        assert_eq!(v["message"], "Chart data ready for rendering");
    }
}
