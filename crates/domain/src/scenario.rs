//! Scenario and run reports.
//!
//! A scenario is one independently reported test case. A run is the ordered
//! sequence of scenarios executed against one API host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::testing::TestResults;

/// Final verdict of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioOutcome {
    /// Every assertion held.
    Passed,
    /// An assertion failed, the request failed, or a prerequisite was missing.
    Failed,
}

/// Report for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Verdict.
    pub outcome: ScenarioOutcome,
    /// Assertion results; empty when no response was received.
    pub results: TestResults,
    /// Transport or prerequisite error, if the scenario could not be evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time spent in the scenario.
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Builds a report from evaluated assertions.
    #[must_use]
    pub fn evaluated(name: impl Into<String>, results: TestResults, duration_ms: u64) -> Self {
        let outcome = if results.all_passed() {
            ScenarioOutcome::Passed
        } else {
            ScenarioOutcome::Failed
        };
        Self {
            name: name.into(),
            outcome,
            results,
            error: None,
            duration_ms,
        }
    }

    /// Builds a failed report for a scenario that could not be evaluated.
    #[must_use]
    pub fn errored(name: impl Into<String>, error: impl Into<String>, duration_ms: u64) -> Self {
        let name = name.into();
        Self {
            results: TestResults::empty(name.clone()),
            name,
            outcome: ScenarioOutcome::Failed,
            error: Some(error.into()),
            duration_ms,
        }
    }

    /// Marks an evaluated scenario as failed with an additional error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.outcome = ScenarioOutcome::Failed;
        self.error = Some(error.into());
        self
    }

    /// Returns true if the scenario passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == ScenarioOutcome::Passed
    }
}

/// Report for a full run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Scenario reports in execution order.
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    /// Creates an empty report starting at `started_at`.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at,
            scenarios: Vec::new(),
        }
    }

    /// Appends a scenario report.
    pub fn push(&mut self, scenario: ScenarioReport) {
        self.scenarios.push(scenario);
    }

    /// Number of passed scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    /// Number of failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    /// True if at least one scenario ran and none failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.scenarios.is_empty() && self.failed() == 0
    }

    /// Looks up a scenario by name.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
