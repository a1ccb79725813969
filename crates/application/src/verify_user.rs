//! Verify User Round-Trip Use Case
//!
//! Creates a user through the external API, then fetches it back by the
//! identifier the API assigned. The identifier is handed from the first step
//! to the second as a return value.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use userflow_domain::{
    ApiConfig, Assertion, CreateResponse, FetchResponse, ResourceId, RunReport, ScenarioReport,
    TestSuite, UserInput,
    request::{RequestBody, RequestSpec},
    response::ResponseSpec,
};

use crate::ApplicationResult;
use crate::ports::HttpClient;
use crate::testing::TestRunner;

/// Name of the create scenario.
pub const CREATE_SCENARIO: &str = "create user";
/// Name of the verify scenario.
pub const VERIFY_SCENARIO: &str = "verify created user";

const JSON: &str = "application/json";

/// Result of the create step.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOutcome {
    /// Scenario report.
    pub report: ScenarioReport,
    /// What the API answered, if it answered at all.
    pub response: Option<CreateResponse>,
    /// Identifier to feed into the verify step. Only set when the scenario passed.
    pub captured_id: Option<ResourceId>,
}

/// Result of the verify step.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOutcome {
    /// Scenario report.
    pub report: ScenarioReport,
    /// What the API answered, if a request was sent and answered.
    pub response: Option<FetchResponse>,
}

/// Assertions applied to the create response.
#[must_use]
pub fn create_suite() -> TestSuite {
    TestSuite::new(CREATE_SCENARIO)
        .with_assertion(Assertion::status(201))
        .with_assertion(Assertion::json_defined("$.id"))
}

/// Assertions applied to the fetch response for `id`.
#[must_use]
pub fn verify_suite(id: &ResourceId) -> TestSuite {
    TestSuite::new(VERIFY_SCENARIO)
        .with_assertion(Assertion::status(200))
        .with_assertion(Assertion::json_equals("$.id", id.to_json()))
}

/// Use case running the create-then-fetch verification.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(ReqwestHttpClient::new()?);
/// let use_case = VerifyUserRoundTrip::new(client, ApiConfig::new(DEFAULT_BASE_URL)?);
///
/// let report = use_case.run(&UserInput::fixture()).await;
/// assert!(report.all_passed());
/// ```
pub struct VerifyUserRoundTrip<C: HttpClient> {
    client: Arc<C>,
    config: ApiConfig,
    runner: TestRunner,
}

impl<C: HttpClient> VerifyUserRoundTrip<C> {
    /// Creates the use case with the given HTTP client and target API.
    pub const fn new(client: Arc<C>, config: ApiConfig) -> Self {
        Self {
            client,
            config,
            runner: TestRunner::new(),
        }
    }

    /// Returns the target API configuration.
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Runs both steps in order and reports each scenario.
    ///
    /// Never short-circuits: when the create step yields no identifier the
    /// verify scenario is still reported, as failed.
    pub async fn run(&self, user: &UserInput) -> RunReport {
        let mut report = RunReport::new(Utc::now());

        let created = self.create_user(user).await;
        report.push(created.report);

        let verified = self.verify_user(created.captured_id.as_ref()).await;
        report.push(verified.report);

        info!(
            run_id = %report.run_id,
            passed = report.passed(),
            failed = report.failed(),
            "user round-trip finished"
        );
        report
    }

    /// Step 1: `POST {base}/users` and capture the assigned identifier.
    pub async fn create_user(&self, user: &UserInput) -> CreateOutcome {
        let start = Instant::now();
        info!(username = %user.username, "creating user");

        let response = match self.send_create(user).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "create request failed");
                return CreateOutcome {
                    report: ScenarioReport::errored(
                        CREATE_SCENARIO,
                        e.to_string(),
                        elapsed_ms(start),
                    ),
                    response: None,
                    captured_id: None,
                };
            }
        };

        let results = self.runner.run(&create_suite(), &response);
        let mut report = ScenarioReport::evaluated(CREATE_SCENARIO, results, elapsed_ms(start));
        let created = CreateResponse::from_response(&response);

        let captured_id = if report.passed() {
            match ResourceId::from_body(&response) {
                Ok(id) => Some(id),
                Err(e) => {
                    report = report.with_error(e.to_string());
                    None
                }
            }
        } else {
            None
        };

        log_report(&report);
        if let Some(id) = &captured_id {
            info!(%id, "captured user identifier");
        }

        CreateOutcome {
            report,
            response: Some(created),
            captured_id,
        }
    }

    /// Step 2: `GET {base}/users/{id}` and check the identifier round-trips.
    ///
    /// With no captured identifier nothing is sent and the scenario fails.
    pub async fn verify_user(&self, captured_id: Option<&ResourceId>) -> VerifyOutcome {
        let start = Instant::now();

        let Some(id) = captured_id else {
            warn!("no identifier captured by the create step; verify cannot run");
            return VerifyOutcome {
                report: ScenarioReport::errored(
                    VERIFY_SCENARIO,
                    "no identifier captured by the create step",
                    elapsed_ms(start),
                ),
                response: None,
            };
        };

        info!(%id, "fetching created user");
        let response = match self.send_fetch(id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "fetch request failed");
                return VerifyOutcome {
                    report: ScenarioReport::errored(
                        VERIFY_SCENARIO,
                        e.to_string(),
                        elapsed_ms(start),
                    ),
                    response: None,
                };
            }
        };

        let results = self.runner.run(&verify_suite(id), &response);
        let report = ScenarioReport::evaluated(VERIFY_SCENARIO, results, elapsed_ms(start));
        log_report(&report);

        VerifyOutcome {
            report,
            response: Some(FetchResponse::from_response(&response)),
        }
    }

    async fn send_create(&self, user: &UserInput) -> ApplicationResult<ResponseSpec> {
        let request = RequestSpec::post(
            CREATE_SCENARIO,
            &self.config.users_url()?,
            RequestBody::json_from(user)?,
        );
        self.send(request).await
    }

    async fn send_fetch(&self, id: &ResourceId) -> ApplicationResult<ResponseSpec> {
        let request = RequestSpec::get(VERIFY_SCENARIO, &self.config.user_url(id)?);
        self.send(request).await
    }

    async fn send(&self, request: RequestSpec) -> ApplicationResult<ResponseSpec> {
        let request = request
            .with_header("Accept", JSON)
            .with_timeout_ms(self.config.timeout_ms);
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.client.execute(&request).await?;
        debug!(
            status = response.status,
            duration_ms = response.duration_ms(),
            size = response.size,
            "received response"
        );
        Ok(response)
    }
}

fn log_report(report: &ScenarioReport) {
    if report.passed() {
        info!(scenario = %report.name, "scenario passed");
        return;
    }
    for failure in report.results.failures() {
        warn!(
            scenario = %report.name,
            assertion = %failure.assertion.description(),
            error = failure.error.as_deref().unwrap_or("failed"),
            "assertion failed"
        );
    }
    if let Some(error) = &report.error {
        warn!(scenario = %report.name, %error, "scenario failed");
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
