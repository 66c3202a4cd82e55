//! `mc-logline`: the LogLine span gateway.
//!
//! Every domain verb (create a folder, list conversations, register a
//! contract, ...) becomes one [`Span`] posted to `POST {base_url}/spans`.
//! The answer maps to a [`SpanResponse`] or a typed
//! [`mc_domain::error::Error`]:
//!
//! | Answer            | Result                         |
//! |-------------------|--------------------------------|
//! | 2xx               | `Ok(SpanResponse)`             |
//! | 401               | `Err(Error::Unauthorized)`     |
//! | other non-2xx     | `Err(Error::Remote{status,..})`|
//! | no credential     | `Err(Error::Unauthenticated)`, nothing sent |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mc_domain::config::LogLineConfig;
//! use mc_logline::{Credential, SpanGateway};
//!
//! # async fn example() -> mc_domain::error::Result<()> {
//! let cfg = LogLineConfig::default();
//! let credential = Credential::select(None, cfg.resolve_api_key());
//! let gateway = SpanGateway::from_config(&cfg, credential)?;
//!
//! let folder = gateway.create_folder("Vendas").await?;
//! println!("created in span {}", folder.span_id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod conversations;
pub mod credential;
pub mod flows;
pub mod folders;
pub mod gateway;
pub mod messages;
pub mod rest;
pub mod span;
pub mod transport;
pub mod views;
pub mod workspace;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use auth::{AuthClient, AuthIdentity, TokenVerification};
pub use conversations::{ConversationFilter, ConversationUpdate};
pub use credential::Credential;
pub use flows::{ContractDraft, ContractQuery, FlowDraft};
pub use gateway::SpanGateway;
pub use rest::RestTransport;
pub use span::{Span, SpanDraft, SpanIntent, SpanResponse};
pub use transport::{Method, RawResponse, Transport, TransportRequest};
pub use views::{ChatMessage, Conversation, Flow, Folder, WorkspaceSnapshot};
