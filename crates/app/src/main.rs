//! userflow - Main Entry Point
//!
//! Runs the create-then-fetch user verification against the configured
//! API host and exits non-zero if any scenario fails.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use userflow_application::VerifyUserRoundTrip;
use userflow_domain::{RunReport, ScenarioOutcome, UserInput};
use userflow_infrastructure::{ReqwestHttpClient, load_settings};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = load_settings()?;
    info!(
        base_url = %settings.api.base_url(),
        "Starting userflow v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(ReqwestHttpClient::new()?);
    let use_case = VerifyUserRoundTrip::new(client, settings.api);
    let report = use_case.run(&UserInput::fixture()).await;

    if settings.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(report: &RunReport) {
    for scenario in &report.scenarios {
        let mark = match scenario.outcome {
            ScenarioOutcome::Passed => "PASS",
            ScenarioOutcome::Failed => "FAIL",
        };
        println!("{mark} {} ({}ms)", scenario.name, scenario.duration_ms);

        for result in &scenario.results.results {
            let status = if result.passed { "ok" } else { "failed" };
            println!("    {status}: {}", result.assertion.description());
            if let Some(error) = &result.error {
                println!("        {error}");
            }
        }
        if let Some(error) = &scenario.error {
            println!("    error: {error}");
        }
    }
    println!(
        "{} passed, {} failed (run {})",
        report.passed(),
        report.failed(),
        report.run_id
    );
}
