//! Message verbs.

use mc_domain::error::Result;
use serde_json::json;

use crate::gateway::{json_text, SpanGateway};
use crate::span::{Span, SpanIntent, SpanResponse};
use crate::views::{hydrate, ChatMessage};

const ENTITY: &str = "message";

impl SpanGateway {
    pub async fn get_messages(
        &self,
        conversation_id: &str,
        limit: Option<u32>,
    ) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Query)
            .context(format!("List messages of conversation {conversation_id}"))
            .response(r#"{"status":"querying"}"#)
            .entity(ENTITY)
            .field("conversation_id", conversation_id)
            .field_opt("limit", limit)
            .meta("type", "message_list")
            .meta("trace_id", conversation_id);
        self.dispatch(draft).await
    }

    /// [`get_messages`](Self::get_messages), decoded.
    pub async fn list_messages(
        &self,
        conversation_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ChatMessage>> {
        let resp = self.get_messages(conversation_id, limit).await?;
        hydrate(&resp)
    }

    /// Record a chat message. The trace id is the conversation id, or a
    /// fresh `trace_<millis>` for a message outside any conversation.
    pub async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
        model: &str,
    ) -> Result<SpanResponse> {
        let trace_id = conversation_id
            .map(str::to_owned)
            .unwrap_or_else(|| format!("trace_{}", chrono::Utc::now().timestamp_millis()));

        let draft = Span::draft(SpanIntent::LlmChat)
            .context(message)
            .response(json_text(&json!({ "status": "sent", "model": model })))
            .entity(ENTITY)
            .field("message", message)
            .field_opt("conversation_id", conversation_id)
            .field("model", model)
            .meta("type", "message_sent")
            .meta("trace_id", trace_id);
        self.dispatch(draft).await
    }
}
