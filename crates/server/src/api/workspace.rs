use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

use super::{bearer_token, respond};
use crate::state::AppState;

/// Folders and conversations, fetched together.
pub async fn load(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let result = state
        .gateway_for(bearer_token(&headers))
        .load_workspace()
        .await;
    respond("load_workspace", result)
}
