//! The seam between the gateway and the wire.
//!
//! [`Transport`] moves one request and hands back the raw status and
//! body; the gateway decides what they mean. [`crate::rest::RestTransport`]
//! is the production implementation, tests swap in recorders.

use async_trait::async_trait;
use mc_domain::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound request, relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Full `Authorization` header value, if any.
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            authorization: None,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            authorization: None,
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    pub fn authorization(mut self, value: Option<String>) -> Self {
        self.authorization = value;
        self
    }

    /// `"POST /spans"`-style label for logs.
    pub fn endpoint(&self) -> String {
        let verb = match self.method {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        format!("{verb} {}", self.path)
    }
}

/// Status and body exactly as received.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx answer, or the matching error.
    ///
    /// 401 is reported as [`Error::Unauthorized`]; every other non-2xx as
    /// [`Error::Remote`] carrying the status and raw body.
    pub fn into_success_body(self) -> Result<String> {
        if self.is_success() {
            return Ok(self.body);
        }
        if self.status == 401 {
            return Err(Error::Unauthorized(self.body));
        }
        Err(Error::Remote {
            status: self.status,
            body: self.body,
        })
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: TransportRequest) -> Result<RawResponse>;
}
