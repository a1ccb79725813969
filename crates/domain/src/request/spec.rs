//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{Headers, HttpMethod, RequestBody};

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Complete specification for an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Unique identifier for this request
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Timeout in milliseconds
    pub timeout_ms: u64,
}

impl RequestSpec {
    /// Creates a new request specification with default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            method: HttpMethod::default(),
            url: String::new(),
            headers: Headers::new(),
            body: RequestBody::none(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Creates a GET request for `url`.
    #[must_use]
    pub fn get(name: impl Into<String>, url: &Url) -> Self {
        Self {
            url: url.to_string(),
            ..Self::new(name)
        }
    }

    /// Creates a POST request for `url` carrying `body`.
    #[must_use]
    pub fn post(name: impl Into<String>, url: &Url, body: RequestBody) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.to_string(),
            body,
            ..Self::new(name)
        }
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Overrides the timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Validates the URL and returns parsed version if valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn parse_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }
}
