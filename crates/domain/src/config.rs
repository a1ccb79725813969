//! API target configuration.

use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::DEFAULT_TIMEOUT_MS;
use crate::user::ResourceId;

/// Public sandbox host the scenario targets by default.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Where and how to reach the users API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ApiConfig {
    /// Creates a configuration for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` unless `base_url` is an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: &str) -> DomainResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {base_url}",
                base_url.scheme()
            )));
        }
        Ok(Self {
            base_url,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    /// Overrides the timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/users`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the base cannot carry a path.
    pub fn users_url(&self) -> DomainResult<Url> {
        self.with_segments(&["users"])
    }

    /// `{base}/users/{id}`, with `id` percent-encoded as one path segment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the base cannot carry a path.
    pub fn user_url(&self, id: &ResourceId) -> DomainResult<Url> {
        self.with_segments(&["users", &id.path_segment()])
    }

    fn with_segments(&self, segments: &[&str]) -> DomainResult<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| DomainError::InvalidUrl(format!("cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_targets_sandbox() {
        let config = ApiConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            config.users_url().unwrap().as_str(),
            "https://fakestoreapi.com/users"
        );
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_user_url_with_numeric_id() {
        let config = ApiConfig::new("http://127.0.0.1:4010").unwrap();
        assert_eq!(
            config.user_url(&ResourceId::from(21_u64)).unwrap().as_str(),
            "http://127.0.0.1:4010/users/21"
        );
    }

    #[test]
    fn test_base_with_path_and_trailing_slash() {
        let config = ApiConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            config.users_url().unwrap().as_str(),
            "https://api.example.com/v1/users"
        );
    }

    #[test]
    fn test_string_id_is_encoded_as_single_segment() {
        let config = ApiConfig::new("https://api.example.com").unwrap();
        let url = config.user_url(&ResourceId::from("a b/c")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/users/a%20b%2Fc");
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(
            ApiConfig::new("ftp://example.com"),
            Err(DomainError::InvalidUrl(_))
        ));
        assert!(ApiConfig::new("not a url").is_err());
    }
}
