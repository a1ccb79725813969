//! User fixture and identifier types.
//!
//! The identifier returned by the users API is opaque: depending on the
//! deployment it may be a JSON number or a JSON string. `ResourceId` keeps the
//! exact JSON representation so that comparisons never coerce between the two.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{DomainError, DomainResult};
use crate::response::ResponseSpec;

/// Body of the create-user request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Plaintext password, sent as-is to the sandbox API.
    pub password: String,
}

impl UserInput {
    /// Creates a new user input.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// The canonical fixture used against the public sandbox API.
    #[must_use]
    pub fn fixture() -> Self {
        Self::new("cleber.santos", "cleber@teste.com.br", "Teste123")
    }
}

/// Opaque identifier assigned by the external API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Numeric identifier, e.g. `21`.
    Number(Number),
    /// String identifier, e.g. `"64b1f0c2"`.
    Text(String),
}

impl ResourceId {
    /// Interprets a JSON value as an identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` for `null` and for any value
    /// that is neither a string nor a number.
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        match value {
            Value::Number(n) => Ok(Self::Number(n.clone())),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Null => Err(DomainError::InvalidIdentifier(
                "identifier is null".to_string(),
            )),
            other => Err(DomainError::InvalidIdentifier(format!(
                "unsupported identifier type: {other}"
            ))),
        }
    }

    /// Reads the top-level `id` field of a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if the body is not JSON, has no
    /// `id` field, or the field is not a usable identifier.
    pub fn from_body(response: &ResponseSpec) -> DomainResult<Self> {
        let body = response
            .json()
            .map_err(|e| DomainError::InvalidIdentifier(format!("body is not JSON: {e}")))?;
        let id = body.get("id").ok_or_else(|| {
            DomainError::InvalidIdentifier("response body has no 'id' field".to_string())
        })?;
        Self::from_json(id)
    }

    /// Returns the identifier as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Returns the textual form used as a URL path segment (not yet encoded).
    #[must_use]
    pub fn path_segment(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ResourceId {
    // JSON form, so 21 and "21" stay distinguishable in reports.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// What the create step observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResponse {
    /// HTTP status code.
    pub status: u16,
    /// Identifier in the body, if one was present and usable.
    pub id: Option<ResourceId>,
}

impl CreateResponse {
    /// Extracts the create-step view of an HTTP response.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        Self {
            status: response.status,
            id: ResourceId::from_body(response).ok(),
        }
    }
}

/// What the verify step observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Identifier in the body, if one was present and usable.
    pub id: Option<ResourceId>,
}

impl FetchResponse {
    /// Extracts the verify-step view of an HTTP response.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        Self {
            status: response.status,
            id: ResourceId::from_body(response).ok(),
        }
    }

    /// Returns true if the fetched identifier equals `expected` exactly.
    #[must_use]
    pub fn matches(&self, expected: &ResourceId) -> bool {
        self.id.as_ref() == Some(expected)
    }
}
