use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use mc_logline::{ConversationFilter, ConversationUpdate};
use serde::Deserialize;

use super::extract::{ActionJson, ActionQuery};
use super::{bearer_token, failure, respond, ActionResult};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    ActionQuery(filter): ActionQuery<ConversationFilter>,
) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .get_conversations(&filter)
        .await
        .map(|resp| resp.result);
    respond("get_conversations", result)
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    #[serde(default = "d_title")]
    pub title: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}

fn d_title() -> String {
    "New Conversation".into()
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    ActionJson(body): ActionJson<CreateBody>,
) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .create_conversation(&body.title, body.folder_id.as_deref())
        .await
        .map(|resp| resp.result);
    respond("create_conversation", result)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    ActionQuery(params): ActionQuery<SearchParams>,
) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .search_conversations(&params.q)
        .await
        .map(|resp| resp.result);
    respond("search_conversations", result)
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ActionJson(update): ActionJson<ConversationUpdate>,
) -> Response {
    match state
        .gateway_for(bearer_token(&headers))
        .update_conversation(&id, &update)
        .await
    {
        Ok(_) => ActionResult::ok(None).into_response(),
        Err(e) => failure("update_conversation", e),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    match state
        .gateway_for(bearer_token(&headers))
        .delete_conversation(&id)
        .await
    {
        Ok(_) => ActionResult::ok(None).into_response(),
        Err(e) => failure("delete_conversation", e),
    }
}
