//! `mc-agent`: the Minicontratos agent.
//!
//! [`AgentDispatcher`] sends a user message to the model with the five
//! tools, runs the requested tools through a [`ToolExecutor`], and returns
//! one [`mc_domain::contract::AgentResponse`].

pub mod dispatcher;
pub mod display;
pub mod executor;
pub mod prompts;
pub mod tools;

pub use dispatcher::{anthropic_factory, AgentDispatcher, ProviderFactory};
pub use display::format_contract_for_display;
pub use executor::{LogLineToolExecutor, ToolExecutor};
pub use tools::{AgentToolCall, ChartKind, ChartSpec};
