//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces test results.

use serde_json::Value;
use userflow_domain::response::ResponseSpec;
use userflow_domain::testing::{
    Assertion, AssertionResult, StatusExpectation, TestResults, TestSuite,
};

/// Test runner that executes assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run a test suite against a response.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = Self::run_assertion(assertion, response);
            let failed = !result.passed;
            results.push(result);

            if failed && (self.stop_on_failure || suite.stop_on_failure) {
                break;
            }
        }

        TestResults::new(&suite.name, results)
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::ResponseTime { max_ms } => check_response_time(assertion, response, *max_ms),
            Assertion::HeaderExists { name, value } => {
                check_header_exists(assertion, response, name, value.as_deref())
            }
            Assertion::JsonPath { path, expected } => {
                check_json_path(assertion, response, path, expected.as_ref())
            }
            Assertion::IsJson => check_is_json(assertion, response),
            Assertion::ContentType { expected } => {
                check_content_type(assertion, response, expected)
            }
        }
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected status {}, got {}", expected.description(), actual),
        )
    }
}

fn check_response_time(
    assertion: &Assertion,
    response: &ResponseSpec,
    max_ms: u64,
) -> AssertionResult {
    let actual_ms = response.duration_ms();
    if actual_ms <= max_ms {
        AssertionResult::pass_with_value(assertion.clone(), format!("{actual_ms}ms"))
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            format!("{actual_ms}ms"),
            format!("Response took {actual_ms}ms, expected <= {max_ms}ms"),
        )
    }
}

fn check_header_exists(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    expected: Option<&str>,
) -> AssertionResult {
    match (response.header(name), expected) {
        (None, _) => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
        (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
            assertion.clone(),
            actual,
            format!("Header '{name}' is '{actual}', expected '{expected}'"),
        ),
        (Some(actual), _) => AssertionResult::pass_with_value(assertion.clone(), actual),
    }
}

fn check_json_path(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
    expected: Option<&Value>,
) -> AssertionResult {
    let json = match response.json() {
        Ok(json) => json,
        Err(e) => {
            return AssertionResult::fail(
                assertion.clone(),
                format!("Failed to parse body as JSON: {e}"),
            );
        }
    };

    match query_json_path(&json, path) {
        Ok(Some(value)) => match expected {
            Some(expected_value) if &value == expected_value => {
                AssertionResult::pass_with_value(assertion.clone(), value.to_string())
            }
            Some(expected_value) => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!(
                    "JSON path '{path}' value mismatch: expected {expected_value}, got {value}"
                ),
            ),
            None if value.is_null() => AssertionResult::fail_with_value(
                assertion.clone(),
                "null",
                format!("JSON path '{path}' is null"),
            ),
            None => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        },
        Ok(None) => {
            AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found"))
        }
        Err(e) => AssertionResult::fail(
            assertion.clone(),
            format!("Invalid JSON path '{path}': {e}"),
        ),
    }
}

fn check_is_json(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
    match response.json() {
        Ok(_) => AssertionResult::pass(assertion.clone()),
        Err(e) => AssertionResult::fail(assertion.clone(), format!("Body is not valid JSON: {e}")),
    }
}

fn check_content_type(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &str,
) -> AssertionResult {
    match &response.content_type {
        Some(actual) if actual.contains(expected) => {
            AssertionResult::pass_with_value(assertion.clone(), actual.clone())
        }
        Some(actual) => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.clone(),
            format!("Content-Type '{actual}' does not contain '{expected}'"),
        ),
        None => AssertionResult::fail(assertion.clone(), "No Content-Type header present"),
    }
}

/// Query a JSON value using a simple JSONPath-like syntax.
/// Supports: $.field, $.field.nested, $.array[0]
fn query_json_path(json: &Value, path: &str) -> Result<Option<Value>, String> {
    let Some(rest) = path.trim().strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);

    let mut current = json;
    for segment in rest.split('.').filter(|s| !s.is_empty()) {
        let (name, index) = parse_array_access(segment)?;
        if !name.is_empty() {
            match current.get(name) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
        if let Some(idx) = index {
            match current.get(idx) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current.clone()))
}

/// Parse "field[0]" into ("field", Some(0)) and "field" into ("field", None).
fn parse_array_access(segment: &str) -> Result<(&str, Option<usize>), String> {
    let Some(bracket_start) = segment.find('[') else {
        return Ok((segment, None));
    };
    let index = segment[bracket_start + 1..]
        .strip_suffix(']')
        .ok_or_else(|| format!("Unclosed bracket in segment: {segment}"))?;
    let idx = index
        .parse()
        .map_err(|_| format!("Invalid array index: {index}"))?;
    Ok((&segment[..bracket_start], Some(idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn create_response(status: u16, body: &str, headers: HashMap<String, String>) -> ResponseSpec {
        ResponseSpec::new(status, headers, body.as_bytes().to_vec(), Duration::from_millis(50))
    }

    fn json_response(status: u16, body: &str) -> ResponseSpec {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        create_response(status, body, headers)
    }

    #[test]
    fn test_status_code_exact() {
        let response = json_response(201, "{}");
        let result = TestRunner::run_assertion(&Assertion::status(201), &response);
        assert!(result.passed);
        assert_eq!(result.actual.as_deref(), Some("201"));

        let result = TestRunner::run_assertion(&Assertion::status(200), &response);
        assert!(!result.passed);
        assert_eq!(result.error.as_deref(), Some("Expected status = 200, got 201"));
    }

    #[test]
    fn test_response_time() {
        let response = json_response(200, "{}");
        let within = Assertion::ResponseTime { max_ms: 100 };
        assert!(TestRunner::run_assertion(&within, &response).passed);

        let too_slow = Assertion::ResponseTime { max_ms: 10 };
        assert!(!TestRunner::run_assertion(&too_slow, &response).passed);
    }

    #[test]
    fn test_header_exists() {
        let response = json_response(200, "{}");
        let exists = Assertion::HeaderExists {
            name: "content-type".to_string(),
            value: None,
        };
        assert!(TestRunner::run_assertion(&exists, &response).passed);

        let wrong_value = Assertion::HeaderExists {
            name: "Content-Type".to_string(),
            value: Some("text/plain".to_string()),
        };
        assert!(!TestRunner::run_assertion(&wrong_value, &response).passed);

        let missing = Assertion::HeaderExists {
            name: "X-Request-Id".to_string(),
            value: None,
        };
        assert!(!TestRunner::run_assertion(&missing, &response).passed);
    }

    #[test]
    fn test_json_path_defined() {
        let response = json_response(201, r#"{"id": 21, "name": null}"#);
        assert!(TestRunner::run_assertion(&Assertion::json_defined("$.id"), &response).passed);

        let result = TestRunner::run_assertion(&Assertion::json_defined("$.name"), &response);
        assert!(!result.passed);
        assert_eq!(result.error.as_deref(), Some("JSON path '$.name' is null"));

        let result = TestRunner::run_assertion(&Assertion::json_defined("$.missing"), &response);
        assert_eq!(result.error.as_deref(), Some("JSON path '$.missing' not found"));
    }

    #[test]
    fn test_json_path_equality_is_strict() {
        let response = json_response(200, r#"{"id": 21}"#);
        let same = Assertion::json_equals("$.id", json!(21));
        assert!(TestRunner::run_assertion(&same, &response).passed);

        let coerced = Assertion::json_equals("$.id", json!("21"));
        assert!(!TestRunner::run_assertion(&coerced, &response).passed);
    }

    #[test]
    fn test_json_path_nested_and_array() {
        let response = json_response(200, r#"{"data": {"users": [{"id": 1}, {"id": 2}]}}"#);
        let assertion = Assertion::json_equals("$.data.users[1].id", json!(2));
        assert!(TestRunner::run_assertion(&assertion, &response).passed);

        let out_of_range = Assertion::json_defined("$.data.users[5]");
        assert!(!TestRunner::run_assertion(&out_of_range, &response).passed);
    }

    #[test]
    fn test_json_path_invalid() {
        let response = json_response(200, r#"{"id": 1}"#);
        let result = TestRunner::run_assertion(&Assertion::json_defined("id"), &response);
        assert!(!result.passed);
        assert!(result.error.unwrap_or_default().starts_with("Invalid JSON path"));

        let result = TestRunner::run_assertion(&Assertion::json_defined("$.items[x]"), &response);
        assert!(!result.passed);
    }

    #[test]
    fn test_json_path_on_non_json_body() {
        let response = create_response(201, "Created", HashMap::new());
        let result = TestRunner::run_assertion(&Assertion::json_defined("$.id"), &response);
        assert!(!result.passed);
        assert!(!TestRunner::run_assertion(&Assertion::IsJson, &response).passed);
    }

    #[test]
    fn test_content_type() {
        let assertion = Assertion::ContentType {
            expected: "json".to_string(),
        };
        assert!(TestRunner::run_assertion(&assertion, &json_response(200, "{}")).passed);

        let response = create_response(200, "{}", HashMap::new());
        let result = TestRunner::run_assertion(&assertion, &response);
        assert_eq!(result.error.as_deref(), Some("No Content-Type header present"));
    }

    #[test]
    fn test_run_suite() {
        let response = json_response(201, r#"{"id": 7}"#);
        let suite = TestSuite::new("create user")
            .with_assertion(Assertion::status(201))
            .with_assertion(Assertion::json_defined("$.id"));

        let results = TestRunner::new().run(&suite, &response);
        assert_eq!(results.total, 2);
        assert!(results.all_passed());
    }

    #[test]
    fn test_stop_on_failure() {
        let response = json_response(500, "oops");
        let suite = TestSuite::new("create user")
            .with_assertion(Assertion::status(201))
            .with_assertion(Assertion::json_defined("$.id"));

        let results = TestRunner::new().run(&suite, &response);
        assert_eq!(results.total, 2);
        assert_eq!(results.failed, 2);

        let results = TestRunner::new().with_stop_on_failure(true).run(&suite, &response);
        assert_eq!(results.total, 1);
        assert_eq!(results.failed, 1);
    }
}
