/// Shared error type used across all Minicontratos crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    /// No bearer token and no API key were available for LogLine.
    #[error("unauthenticated: no LogLine bearer token or API key configured")]
    Unauthenticated,

    /// LogLine rejected the credential (HTTP 401).
    #[error("unauthorized: LogLine rejected the credential: {0}")]
    Unauthorized(String),

    /// Any other non-2xx answer from LogLine.
    #[error("LogLine API error: {status} - {body}")]
    Remote { status: u16, body: String },

    #[error("invalid span: {0}")]
    InvalidSpan(String),

    #[error("invalid input for tool {tool}: {message}")]
    InvalidToolInput { tool: String, message: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool call limit exceeded: {requested} requested, at most {limit} allowed")]
    ToolLimit { requested: usize, limit: usize },

    #[error("config: {0}")]
    Config(String),

    /// A caller's request could not be read (bad JSON, missing field).
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convert a `reqwest::Error` into a domain [`Error`].
///
/// Timeouts become [`Error::Timeout`]; everything else becomes
/// [`Error::Http`].
#[cfg(feature = "reqwest")]
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

impl Error {
    /// `true` for errors detected before any network call was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Unauthenticated)
    }
}
