//! Conversation verbs.

use mc_domain::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::gateway::{json_text, SpanGateway};
use crate::span::{Span, SpanIntent, SpanResponse};
use crate::views::{hydrate, Conversation};

const ENTITY: &str = "conversation";

/// Narrowing for a conversation list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Partial update. `folder_id: Some(None)` moves the conversation out of
/// its folder; `None` leaves the folder untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConversationUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub folder_id: Option<Option<String>>,
}

impl ConversationUpdate {
    fn payload_fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        if let Some(ref title) = self.title {
            fields.push(("title", Value::String(title.clone())));
        }
        if let Some(ref folder) = self.folder_id {
            fields.push((
                "folder_id",
                folder.clone().map(Value::String).unwrap_or(Value::Null),
            ));
        }
        fields
    }
}

fn double_option<'de, D, T>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl SpanGateway {
    pub async fn get_conversations(&self, filter: &ConversationFilter) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Query)
            .context("List conversations")
            .response(r#"{"status":"querying"}"#)
            .entity(ENTITY)
            .field_opt("folder_id", filter.folder_id.clone())
            .field_opt("date_from", filter.date_from.clone())
            .field_opt("date_to", filter.date_to.clone())
            .field_opt("limit", filter.limit)
            .meta("type", "conversation_list");
        self.dispatch(draft).await
    }

    /// [`get_conversations`](Self::get_conversations), decoded.
    pub async fn list_conversations(
        &self,
        filter: &ConversationFilter,
    ) -> Result<Vec<Conversation>> {
        let resp = self.get_conversations(filter).await?;
        hydrate(&resp)
    }

    pub async fn create_conversation(
        &self,
        title: &str,
        folder_id: Option<&str>,
    ) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Install)
            .context(format!("Create conversation: {title}"))
            .response(json_text(&json!({ "title": title, "folder_id": folder_id })))
            .entity(ENTITY)
            .field("title", title)
            .field_opt("folder_id", folder_id)
            .meta("type", "conversation_created");
        self.dispatch(draft).await
    }

    pub async fn update_conversation(
        &self,
        conversation_id: &str,
        update: &ConversationUpdate,
    ) -> Result<SpanResponse> {
        let fields = update.payload_fields();
        let summary: serde_json::Map<String, Value> = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect();

        let mut draft = Span::draft(SpanIntent::Update)
            .context(format!("Update conversation {conversation_id}"))
            .response(json_text(&Value::Object(summary)))
            .entity(ENTITY)
            .field("conversation_id", conversation_id)
            .meta("type", "conversation_updated");
        for (key, value) in fields {
            draft = draft.field(key, value);
        }
        self.dispatch(draft).await
    }

    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Delete)
            .context(format!("Delete conversation {conversation_id}"))
            .response(json_text(&json!({ "conversation_id": conversation_id })))
            .entity(ENTITY)
            .field("conversation_id", conversation_id)
            .meta("type", "conversation_deleted");
        self.dispatch(draft).await
    }

    pub async fn search_conversations(&self, query: &str) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Query)
            .context(format!("Search conversations: {query}"))
            .response(r#"{"status":"searching"}"#)
            .entity(ENTITY)
            .field("search", query)
            .meta("type", "conversation_search");
        self.dispatch(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_absent_and_null_folder() {
        let absent: ConversationUpdate = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.folder_id, None);

        let cleared: ConversationUpdate = serde_json::from_str(r#"{"folder_id": null}"#).unwrap();
        assert_eq!(cleared.folder_id, Some(None));

        let moved: ConversationUpdate = serde_json::from_str(r#"{"folder_id": "f1"}"#).unwrap();
        assert_eq!(moved.folder_id, Some(Some("f1".into())));
    }

    #[test]
    fn cleared_folder_serializes_as_null() {
        let update = ConversationUpdate {
            title: None,
            folder_id: Some(None),
        };
        let fields = update.payload_fields();
        assert_eq!(fields, vec![("folder_id", Value::Null)]);
    }
}
