//! Response testing and assertions.
//!
//! This module provides types for defining expectations on HTTP responses
//! and collecting the outcome of evaluating them.

use serde::{Deserialize, Serialize};

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check response time.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Check header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check JSON path is defined and optionally equals a value.
    ///
    /// Without an expected value, a path that resolves to `null` counts as
    /// undefined. With one, equality is strict JSON equality.
    JsonPath {
        /// JSONPath expression (e.g., "$.data.id").
        path: String,
        /// Expected value (as JSON).
        expected: Option<serde_json::Value>,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check content type.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
}

impl Assertion {
    /// Status code must equal `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// JSON path must resolve to a non-null value.
    #[must_use]
    pub fn json_defined(path: impl Into<String>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: None,
        }
    }

    /// JSON path must equal `expected` exactly.
    #[must_use]
    pub fn json_equals(path: impl Into<String>, expected: serde_json::Value) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ResponseTime { max_ms } => format!("Response time <= {max_ms}ms"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} is defined"),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub const fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// A test suite containing multiple assertions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Test suite name.
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Whether to stop on first failure.
    #[serde(default)]
    pub stop_on_failure: bool,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed,
        }
    }

    /// Empty results for a suite that never ran.
    #[must_use]
    pub fn empty(suite_name: impl Into<String>) -> Self {
        Self::new(suite_name, Vec::new())
    }

    /// Check if all tests passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Iterates over failed assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::Exact(201);
        assert!(exp.matches(201));
        assert!(!exp.matches(200));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(201).description(), "Status code = 201");
        assert_eq!(
            Assertion::json_defined("$.id").description(),
            "JSON $.id is defined"
        );
        assert_eq!(
            Assertion::json_equals("$.id", serde_json::json!("21")).description(),
            "JSON $.id equals \"21\""
        );
    }

    #[test]
    fn test_assertion_serde_tag() {
        let json = serde_json::to_value(Assertion::status(200)).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"type": "status_code", "expected": 200}));
    }

    #[test]
    fn test_test_suite_builder() {
        let suite = TestSuite::new("create user")
            .with_assertion(Assertion::status(201))
            .with_assertion(Assertion::json_defined("$.id"));

        assert_eq!(suite.name, "create user");
        assert_eq!(suite.len(), 2);
        assert!(!suite.is_empty());
    }

    #[test]
    fn test_test_results() {
        let results = vec![
            AssertionResult::pass(Assertion::status(200)),
            AssertionResult::fail(Assertion::IsJson, "Invalid JSON"),
        ];

        let test_results = TestResults::new("Suite", results);
        assert_eq!(test_results.total, 2);
        assert_eq!(test_results.passed, 1);
        assert_eq!(test_results.failed, 1);
        assert!(!test_results.all_passed());
        assert_eq!(test_results.failures().count(), 1);
        assert!(TestResults::empty("none").all_passed());
    }
}
