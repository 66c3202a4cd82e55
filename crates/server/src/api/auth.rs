//! Sign-in helpers. These proxy to LogLine without a credential.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use mc_domain::error::Error;
use mc_logline::AuthIdentity;
use serde::Deserialize;

use super::extract::{ActionJson, ActionQuery};
use super::{failure, respond, ActionResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MagicLinkBody {
    pub email: String,
}

pub async fn magic_link(
    State(state): State<AppState>,
    ActionJson(body): ActionJson<MagicLinkBody>,
) -> Response {
    respond("request_magic_link", state.auth.request_magic_link(&body.email).await)
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub token: String,
}

pub async fn verify(
    State(state): State<AppState>,
    ActionQuery(params): ActionQuery<VerifyParams>,
) -> Response {
    let verification = match state.auth.verify_token(&params.token).await {
        Ok(v) => v,
        Err(e) => return failure("verify_token", e),
    };
    match AuthIdentity::from_verification(&params.token, &verification) {
        Some(identity) => match serde_json::to_value(&identity) {
            Ok(data) => ActionResult::ok(Some(data)).into_response(),
            Err(e) => failure("verify_token", e.into()),
        },
        None => failure(
            "verify_token",
            Error::Unauthorized("verification named no email or LogLine id".into()),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct OnboardingBody {
    #[serde(default = "d_app_name")]
    pub app_name: String,
    pub email: String,
}

fn d_app_name() -> String {
    "minicontratos".into()
}

pub async fn onboarding(
    State(state): State<AppState>,
    ActionJson(body): ActionJson<OnboardingBody>,
) -> Response {
    respond("onboard", state.auth.onboard(&body.app_name, &body.email).await)
}
