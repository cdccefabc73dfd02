pub mod client;
pub mod context;
pub mod events;
pub mod executor;
pub mod state;
pub mod steps;

use anyhow::Result;
use std::time::Duration;

use crate::report;
use crate::utils::config::Config;

pub use client::{ApiRequest, ApiResponse, ApiTransport, HttpClient, HttpMethod};
pub use context::{TestContext, TestUser};
pub use events::*;
pub use executor::{RunOutcome, TestRunner};
pub use state::*;
pub use steps::{Capture, Prerequisite, Step};

/// Run the whole suite once against the configured server.
///
/// Progress and the summary go to stdout. Reports are written when
/// `config.output_dir` is set.
pub fn run_suite(config: &Config) -> Result<RunOutcome> {
    let client = HttpClient::new(
        &config.base_url,
        &config.api_prefix,
        Duration::from_millis(config.timeout_ms),
    )?;
    let context = TestContext::new(&config.base_url);

    let mut runner = TestRunner::new(client, context);
    runner.subscribe(Box::new(ConsoleEventListener::new()));
    let outcome = runner.run_all();

    if let Some(output_dir) = &config.output_dir {
        let results = report::types::TestResults::from_outcome(runner.context(), &outcome);
        report::write_reports(&results, output_dir)?;
    }

    Ok(outcome)
}
