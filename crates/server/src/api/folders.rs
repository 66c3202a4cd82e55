use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::extract::ActionJson;
use super::{bearer_token, failure, respond, ActionResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FolderBody {
    pub name: String,
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .get_folders()
        .await
        .map(|resp| resp.result);
    respond("get_folders", result)
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    ActionJson(body): ActionJson<FolderBody>,
) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .create_folder(&body.name)
        .await
        .map(|resp| resp.result);
    respond("create_folder", result)
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ActionJson(body): ActionJson<FolderBody>,
) -> Response {
    match state
        .gateway_for(bearer_token(&headers))
        .update_folder(&id, &body.name)
        .await
    {
        Ok(_) => ActionResult::ok(None).into_response(),
        Err(e) => failure("update_folder", e),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    match state
        .gateway_for(bearer_token(&headers))
        .delete_folder(&id)
        .await
    {
        Ok(_) => ActionResult::ok(None).into_response(),
        Err(e) => failure("delete_folder", e),
    }
}
