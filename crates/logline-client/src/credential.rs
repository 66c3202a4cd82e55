//! The credential presented to LogLine.

use std::fmt;

/// Authorization for LogLine, resolved once and handed to the gateway.
///
/// A user's bearer token (JWT from the magic-link flow) takes precedence
/// over the service's static API key.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

impl Credential {
    /// Pick the credential to use. Empty strings count as absent.
    pub fn select(bearer: Option<String>, api_key: Option<String>) -> Option<Self> {
        let bearer = bearer.filter(|t| !t.trim().is_empty());
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        match (bearer, api_key) {
            (Some(token), _) => Some(Credential::Bearer(token)),
            (None, Some(key)) => Some(Credential::ApiKey(key)),
            (None, None) => None,
        }
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Credential::Bearer(token) => format!("Bearer {token}"),
            Credential::ApiKey(key) => format!("ApiKey {key}"),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            Credential::Bearer(_) => "bearer",
            Credential::ApiKey(_) => "api_key",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential::{}(<redacted>)", self.scheme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_takes_precedence() {
        let c = Credential::select(Some("jwt".into()), Some("key".into())).unwrap();
        assert_eq!(c.header_value(), "Bearer jwt");
    }

    #[test]
    fn api_key_used_without_bearer() {
        let c = Credential::select(None, Some("key".into())).unwrap();
        assert_eq!(c.header_value(), "ApiKey key");
    }

    #[test]
    fn empty_values_are_absent() {
        assert!(Credential::select(Some("  ".into()), Some(String::new())).is_none());
        assert!(Credential::select(None, None).is_none());
    }

    #[test]
    fn debug_redacts_secret() {
        let c = Credential::ApiKey("super-secret".into());
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("api_key"));
    }
}
