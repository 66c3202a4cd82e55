//! The span gateway: the only code that writes to LogLine.
//!
//! Entity verbs live in sibling modules (`conversations`, `folders`,
//! `messages`, `flows`) as further `impl SpanGateway` blocks; each builds a
//! [`SpanDraft`] and hands it to [`SpanGateway::dispatch`].

use std::sync::Arc;
use std::time::Instant;

use mc_domain::config::LogLineConfig;
use mc_domain::error::{Error, Result};
use mc_domain::trace::TraceEvent;

use crate::credential::Credential;
use crate::rest::RestTransport;
use crate::span::{Span, SpanDraft, SpanEnvelope, SpanResponse};
use crate::transport::{Transport, TransportRequest};

pub(crate) const SPANS_PATH: &str = "/spans";
const DEFAULT_APP: &str = "minicontratos";

/// Posts spans to LogLine on behalf of one caller.
///
/// The credential is fixed at construction. Without one, every call fails
/// with [`Error::Unauthenticated`] and nothing is sent.
#[derive(Clone)]
pub struct SpanGateway {
    transport: Arc<dyn Transport>,
    credential: Option<Credential>,
    wait: bool,
    app: String,
}

impl SpanGateway {
    pub fn new(transport: Arc<dyn Transport>, credential: Option<Credential>) -> Self {
        Self {
            transport,
            credential,
            wait: true,
            app: DEFAULT_APP.into(),
        }
    }

    /// Build a gateway over a fresh [`RestTransport`].
    pub fn from_config(cfg: &LogLineConfig, credential: Option<Credential>) -> Result<Self> {
        let transport = Arc::new(RestTransport::from_config(cfg)?);
        Ok(Self::new(transport, credential)
            .with_wait(cfg.wait)
            .with_app(cfg.app.clone()))
    }

    /// Whether to append `?wait=true`.
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Value stamped into `metadata.app` when a span does not set it.
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = app.into();
        self
    }

    /// Same transport and settings, different credential.
    pub fn with_credential(&self, credential: Option<Credential>) -> Self {
        Self {
            credential,
            ..self.clone()
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Post one span and interpret the answer.
    pub async fn send_span(&self, span: &Span) -> Result<SpanResponse> {
        let credential = self.credential.as_ref().ok_or(Error::Unauthenticated)?;

        let body = serde_json::to_value(SpanEnvelope { span })?;
        let mut req = TransportRequest::post(SPANS_PATH, body)
            .authorization(Some(credential.header_value()));
        if self.wait {
            req = req.query("wait", "true");
        }

        tracing::debug!(
            span_id = %span.id,
            intent = span.intent.as_str(),
            entity_type = ?span.entity_type(),
            auth = credential.scheme(),
            "sending span"
        );

        let start = Instant::now();
        let result = self.transport.send(req).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        TraceEvent::SpanSent {
            intent: span.intent.as_str().to_owned(),
            entity_type: span.entity_type().map(str::to_owned),
            status: result.as_ref().map(|r| r.status).unwrap_or(0),
            duration_ms,
        }
        .emit();

        let body = result?.into_success_body().map_err(|e| {
            tracing::warn!(span_id = %span.id, error = %e, "span rejected");
            e
        })?;

        serde_json::from_str(&body).map_err(|e| {
            Error::Other(format!("failed to parse span response: {e}: {body}"))
        })
    }

    /// Stamp the shared metadata, validate, and send.
    pub(crate) async fn dispatch(&self, draft: SpanDraft) -> Result<SpanResponse> {
        // Check before building so a missing credential wins over a bad span.
        if self.credential.is_none() {
            return Err(Error::Unauthenticated);
        }
        let span = draft.meta_default("app", self.app.as_str()).build()?;
        self.send_span(&span).await
    }
}

impl std::fmt::Debug for SpanGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanGateway")
            .field("credential", &self.credential)
            .field("wait", &self.wait)
            .field("app", &self.app)
            .finish_non_exhaustive()
    }
}

/// Render a value as the compact JSON string used in `span.response`.
pub(crate) fn json_text(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
}
