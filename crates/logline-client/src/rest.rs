//! `reqwest`-backed [`Transport`].
//!
//! One attempt per request: no retry, no back-off. A timeout applies only
//! when `timeout_ms` is non-zero.

use std::time::Duration;

use async_trait::async_trait;
use mc_domain::config::LogLineConfig;
use mc_domain::error::{from_reqwest, Result};
use reqwest::{Client, RequestBuilder};

use crate::transport::{Method, RawResponse, Transport, TransportRequest};

/// HTTP transport for the LogLine API.
///
/// Created once and shared; the underlying `reqwest::Client` pools
/// connections.
#[derive(Debug, Clone)]
pub struct RestTransport {
    http: Client,
    base_url: String,
}

impl RestTransport {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let mut builder = Client::builder();
        if timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(from_reqwest)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn from_config(cfg: &LogLineConfig) -> Result<Self> {
        Self::new(&cfg.base_url, cfg.timeout_ms)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Standard headers on every request.
    fn decorate(&self, rb: RequestBuilder, authorization: Option<&str>) -> RequestBuilder {
        let rb = rb
            .header("X-Client-Type", "minicontratos")
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string());
        match authorization {
            Some(value) => rb.header(reqwest::header::AUTHORIZATION, value),
            None => rb,
        }
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn send(&self, req: TransportRequest) -> Result<RawResponse> {
        let url = self.url(&req.path);
        let mut rb = match req.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if !req.query.is_empty() {
            rb = rb.query(&req.query);
        }
        if let Some(ref body) = req.body {
            rb = rb.json(body);
        }
        let rb = self.decorate(rb, req.authorization.as_deref());

        let resp = rb.send().await.map_err(from_reqwest)?;
        let status = resp.status();
        let body = if status.is_success() {
            resp.text().await.map_err(from_reqwest)?
        } else {
            // Error bodies are informational; the status still counts.
            resp.text().await.unwrap_or_default()
        };
        let status = status.as_u16();

        Ok(RawResponse { status, body })
    }
}
