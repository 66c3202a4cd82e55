//! Sign-in helpers: magic link, token verification, onboarding.
//!
//! These endpoints are public; no credential is attached.

use std::sync::Arc;

use mc_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::transport::{Transport, TransportRequest};

/// Answer of `GET /auth/verify`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenVerification {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub logline_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Who the signed-in user is, derived from a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub email: String,
    pub token: String,
    pub owner_id: String,
    pub tenant_id: String,
}

impl AuthIdentity {
    /// `None` when the verification names neither an email nor a LogLine id.
    pub fn from_verification(token: &str, v: &TokenVerification) -> Option<Self> {
        let email_opt = v.email.as_deref().filter(|e| !e.is_empty());
        let id_opt = v.logline_id.as_deref().filter(|i| !i.is_empty());
        let email = email_opt
            .map(str::to_owned)
            .or_else(|| id_opt.map(|id| format!("{id}@logline.world")))?;

        let owner_id = id_opt
            .map(str::to_owned)
            .or_else(|| {
                email_opt
                    .and_then(|e| e.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| "unknown".into());

        let tenant_id = email_opt
            .and_then(|e| e.split_once('@'))
            .and_then(|(_, domain)| domain.split('.').next())
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| "minicontratos".into());

        Some(Self {
            email,
            token: token.to_owned(),
            owner_id,
            tenant_id,
        })
    }
}

/// Client for the unauthenticated LogLine endpoints.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn Transport>,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `POST /auth/magic-link`.
    pub async fn request_magic_link(&self, email: &str) -> Result<Value> {
        let req = TransportRequest::post("/auth/magic-link", json!({ "email": email }));
        self.call(req).await
    }

    /// `GET /auth/verify?token=…`.
    pub async fn verify_token(&self, token: &str) -> Result<TokenVerification> {
        let req = TransportRequest::get("/auth/verify").query("token", token);
        let value = self.call(req).await?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// `POST /onboarding`.
    pub async fn onboard(&self, app_name: &str, email: &str) -> Result<Value> {
        let req = TransportRequest::post(
            "/onboarding",
            json!({ "app_name": app_name, "email": email }),
        );
        self.call(req).await
    }

    async fn call(&self, req: TransportRequest) -> Result<Value> {
        let endpoint = req.endpoint();
        let body = self.transport.send(req).await?.into_success_body()?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::Other(format!("failed to parse {endpoint} response: {e}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verification(email: Option<&str>, id: Option<&str>) -> TokenVerification {
        TokenVerification {
            email: email.map(str::to_owned),
            logline_id: id.map(str::to_owned),
            extra: Default::default(),
        }
    }

    #[test]
    fn identity_from_email_only() {
        let id = AuthIdentity::from_verification("jwt", &verification(Some("ana@acme.com.br"), None))
            .unwrap();
        assert_eq!(id.email, "ana@acme.com.br");
        assert_eq!(id.owner_id, "ana");
        assert_eq!(id.tenant_id, "acme");
        assert_eq!(id.token, "jwt");
    }

    #[test]
    fn identity_from_logline_id_only() {
        let id = AuthIdentity::from_verification("jwt", &verification(None, Some("ll_42"))).unwrap();
        assert_eq!(id.email, "ll_42@logline.world");
        assert_eq!(id.owner_id, "ll_42");
        assert_eq!(id.tenant_id, "minicontratos");
    }

    #[test]
    fn logline_id_wins_for_owner() {
        let id = AuthIdentity::from_verification(
            "jwt",
            &verification(Some("ana@acme.com"), Some("ll_42")),
        )
        .unwrap();
        assert_eq!(id.owner_id, "ll_42");
        assert_eq!(id.email, "ana@acme.com");
    }

    #[test]
    fn no_identity_without_email_or_id() {
        assert!(AuthIdentity::from_verification("jwt", &verification(None, None)).is_none());
    }
}
