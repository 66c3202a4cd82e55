//! `minicontratos run`: one agent turn from the terminal.

use std::sync::Arc;

use mc_domain::config::Config;

use crate::state::AppState;

/// Execute a single agent turn and print the response.
pub async fn run(
    config: Arc<Config>,
    message: String,
    model: Option<String>,
    token: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let state = AppState::from_config(Arc::clone(&config))?;
    let gateway = state.gateway_for(token);

    let resp = state
        .dispatcher_for(&gateway)
        .process_message(&message, &[], model.as_deref(), None)
        .await?;

    if config.agent.record_interactions && gateway.credential().is_some() {
        gateway.record_interaction(&message, &resp).await?;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    println!("{}", resp.understanding);
    for exec in resp.tool_results.iter().flatten() {
        eprintln!("\x1b[2m[tool: {}]\x1b[0m {}", exec.tool_name, exec.result);
    }
    Ok(())
}
