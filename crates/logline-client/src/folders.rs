//! Folder verbs.

use mc_domain::error::Result;
use serde_json::json;

use crate::gateway::{json_text, SpanGateway};
use crate::span::{Span, SpanIntent, SpanResponse};
use crate::views::{hydrate, Folder};

const ENTITY: &str = "folder";

impl SpanGateway {
    pub async fn get_folders(&self) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Query)
            .context("List folders")
            .response(r#"{"status":"querying"}"#)
            .entity(ENTITY)
            .meta("type", "folder_list");
        self.dispatch(draft).await
    }

    /// [`get_folders`](Self::get_folders), decoded.
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        let resp = self.get_folders().await?;
        hydrate(&resp)
    }

    pub async fn create_folder(&self, name: &str) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Install)
            .context(format!("Create folder: {name}"))
            .response(json_text(&json!({ "name": name })))
            .entity(ENTITY)
            .field("name", name)
            .meta("type", "folder_created");
        self.dispatch(draft).await
    }

    pub async fn update_folder(&self, folder_id: &str, name: &str) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Update)
            .context(format!("Rename folder {folder_id} to {name}"))
            .response(json_text(&json!({ "folder_id": folder_id, "name": name })))
            .entity(ENTITY)
            .field("folder_id", folder_id)
            .field("name", name)
            .meta("type", "folder_updated");
        self.dispatch(draft).await
    }

    pub async fn delete_folder(&self, folder_id: &str) -> Result<SpanResponse> {
        let draft = Span::draft(SpanIntent::Delete)
            .context(format!("Delete folder {folder_id}"))
            .response(json_text(&json!({ "folder_id": folder_id })))
            .entity(ENTITY)
            .field("folder_id", folder_id)
            .meta("type", "folder_deleted");
        self.dispatch(draft).await
    }
}
