//! The span envelope and its builder.
//!
//! Every write or read against LogLine is one span. `context` and
//! `response` must be non-empty; [`SpanDraft::build`] rejects the span
//! before anything reaches the network otherwise.

use chrono::{DateTime, Utc};
use mc_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a span asks LogLine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanIntent {
    LlmChat,
    Query,
    Install,
    Update,
    Delete,
}

impl SpanIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanIntent::LlmChat => "llm_chat",
            SpanIntent::Query => "query",
            SpanIntent::Install => "install",
            SpanIntent::Update => "update",
            SpanIntent::Delete => "delete",
        }
    }
}

/// A validated span, ready to post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub context: String,
    pub response: String,
    pub intent: SpanIntent,
    pub payload: Map<String, Value>,
    pub metadata: Map<String, Value>,
}

impl Span {
    pub fn draft(intent: SpanIntent) -> SpanDraft {
        SpanDraft {
            id: None,
            timestamp: None,
            context: String::new(),
            response: String::new(),
            intent,
            payload: Map::new(),
            metadata: Map::new(),
        }
    }

    /// `payload.entity_type`, when set.
    pub fn entity_type(&self) -> Option<&str> {
        self.payload.get("entity_type").and_then(Value::as_str)
    }
}

/// Wire body of `POST /spans`.
#[derive(Debug, Serialize)]
pub(crate) struct SpanEnvelope<'a> {
    pub span: &'a Span,
}

/// Builder for [`Span`].
#[derive(Debug, Clone)]
pub struct SpanDraft {
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    context: String,
    response: String,
    intent: SpanIntent,
    payload: Map<String, Value>,
    metadata: Map<String, Value>,
}

impl SpanDraft {
    /// Caller-chosen id. The only client-side deduplication key LogLine sees.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Set `payload.entity_type`.
    pub fn entity(self, entity_type: &str) -> Self {
        self.field("entity_type", entity_type)
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }

    /// Insert the field only when `value` is `Some`.
    pub fn field_opt<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self,
        }
    }

    pub fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }

    /// Set a metadata key unless the caller already did.
    pub fn meta_default(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata
            .entry(key.to_owned())
            .or_insert_with(|| value.into());
        self
    }

    pub fn intent(&self) -> SpanIntent {
        self.intent
    }

    pub fn build(self) -> Result<Span> {
        if self.context.trim().is_empty() {
            return Err(Error::InvalidSpan("context must not be empty".into()));
        }
        if self.response.trim().is_empty() {
            return Err(Error::InvalidSpan("response must not be empty".into()));
        }
        Ok(Span {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            context: self.context,
            response: self.response,
            intent: self.intent,
            payload: self.payload,
            metadata: self.metadata,
        })
    }
}

/// LogLine's answer to a posted span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanResponse {
    pub span_id: String,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SpanResponse {
    /// The list carried by `result`: either the array itself or its
    /// `items` member. Anything else is an empty list.
    pub fn result_items(&self) -> &[Value] {
        match &self.result {
            Some(Value::Array(items)) => items,
            Some(Value::Object(obj)) => obj
                .get("items")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_is_rejected() {
        let err = Span::draft(SpanIntent::Query)
            .response("{}")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpan(ref m) if m.contains("context")));
    }

    #[test]
    fn whitespace_response_is_rejected() {
        let err = Span::draft(SpanIntent::Install)
            .context("Create folder: Vendas")
            .response("   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpan(ref m) if m.contains("response")));
    }

    #[test]
    fn build_generates_id_and_keeps_supplied_one() {
        let generated = Span::draft(SpanIntent::Query)
            .context("c")
            .response("r")
            .build()
            .unwrap();
        assert!(!generated.id.is_empty());

        let fixed = Span::draft(SpanIntent::Query)
            .id("span-1")
            .context("c")
            .response("r")
            .build()
            .unwrap();
        assert_eq!(fixed.id, "span-1");
    }

    #[test]
    fn field_opt_skips_none_and_meta_default_keeps_existing() {
        let span = Span::draft(SpanIntent::Query)
            .context("c")
            .response("r")
            .entity("conversation")
            .field_opt::<String>("folder_id", None)
            .field_opt("limit", Some(10))
            .meta("app", "custom")
            .meta_default("app", "minicontratos")
            .build()
            .unwrap();
        assert!(!span.payload.contains_key("folder_id"));
        assert_eq!(span.payload["limit"], 10);
        assert_eq!(span.entity_type(), Some("conversation"));
        assert_eq!(span.metadata["app"], "custom");
    }

    #[test]
    fn envelope_wraps_span_with_snake_case_intent() {
        let span = Span::draft(SpanIntent::LlmChat)
            .context("c")
            .response("r")
            .build()
            .unwrap();
        let v = serde_json::to_value(SpanEnvelope { span: &span }).unwrap();
        assert_eq!(v["span"]["intent"], "llm_chat");
        assert!(v["span"]["timestamp"].is_string());
    }

    #[test]
    fn result_items_accepts_array_or_items_object() {
        let arr: SpanResponse =
            serde_json::from_value(serde_json::json!({"span_id": "s", "result": [1, 2]})).unwrap();
        assert_eq!(arr.result_items().len(), 2);

        let obj: SpanResponse = serde_json::from_value(
            serde_json::json!({"span_id": "s", "result": {"items": [1]}}),
        )
        .unwrap();
        assert_eq!(obj.result_items().len(), 1);

        let none: SpanResponse =
            serde_json::from_value(serde_json::json!({"span_id": "s"})).unwrap();
        assert!(none.result_items().is_empty());
        assert!(none.trace_id.is_none());
    }
}
