//! View models hydrated from query results.
//!
//! LogLine returns loosely-shaped JSON; missing timestamps default to now
//! and a missing conversation title to `"New Conversation"`.

use chrono::{DateTime, Utc};
use mc_domain::error::{Error, Result};
use mc_domain::tool::Role;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::span::SpanResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default = "d_title")]
    pub title: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// Filled by a separate message query; empty after a list.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A user-defined category grouping recorded contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "d_icon")]
    pub icon: String,
}

/// Folders and conversations loaded together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub folders: Vec<Folder>,
    pub conversations: Vec<Conversation>,
}

impl Conversation {
    pub fn in_folder(&self, folder_id: &str) -> bool {
        self.folder_id.as_deref() == Some(folder_id)
    }
}

/// Decode every item of a query result.
pub fn hydrate<T: DeserializeOwned>(resp: &SpanResponse) -> Result<Vec<T>> {
    resp.result_items()
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone()).map_err(|e| {
                Error::Other(format!(
                    "unexpected item in span {} result: {e}",
                    resp.span_id
                ))
            })
        })
        .collect()
}

pub(crate) fn d_title() -> String {
    "New Conversation".into()
}
pub(crate) fn d_icon() -> String {
    "📁".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resp(result: serde_json::Value) -> SpanResponse {
        SpanResponse {
            span_id: "s1".into(),
            trace_id: None,
            result: Some(result),
            error: None,
        }
    }

    #[test]
    fn conversation_defaults_fill_gaps() {
        let convs: Vec<Conversation> = hydrate(&resp(json!([{"id": "c1"}]))).unwrap();
        assert_eq!(convs[0].title, "New Conversation");
        assert!(convs[0].folder_id.is_none());
        assert!(convs[0].messages.is_empty());
    }

    #[test]
    fn conversation_keeps_folder_reference() {
        let convs: Vec<Conversation> = hydrate(&resp(json!([{
            "id": "c1",
            "title": "Pedidos",
            "folder_id": "f1",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z"
        }])))
        .unwrap();
        assert!(convs[0].in_folder("f1"));
        assert_eq!(convs[0].created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn messages_require_known_role() {
        let ok: Vec<ChatMessage> = hydrate(&resp(json!([
            {"id": "m1", "role": "user", "content": "oi"},
            {"id": "m2", "role": "assistant", "content": "olá"}
        ])))
        .unwrap();
        assert_eq!(ok[1].role, Role::Assistant);

        let bad = hydrate::<ChatMessage>(&resp(json!([{"id": "m1", "role": "robot", "content": ""}])));
        assert!(bad.is_err());
    }

    #[test]
    fn flow_icon_defaults() {
        let flows: Vec<Flow> =
            hydrate(&resp(json!({"items": [{"id": "flow-1", "name": "Vendas"}]}))).unwrap();
        assert_eq!(flows[0].icon, "📁");
        assert_eq!(flows[0].description, "");
    }
}
