use crate::runner::context::TestContext;
use crate::runner::executor::RunOutcome;
use crate::runner::state::{StepStateReport, TestSummary};
use serde::{Deserialize, Serialize};

/// Test results for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub run_id: String,
    pub base_url: String,
    pub started_at: String,
    pub generated_at: String,
    pub halted_at: Option<String>,
    pub steps: Vec<StepStateReport>,
    pub summary: TestSummary,
}

impl TestResults {
    pub fn from_outcome(context: &TestContext, outcome: &RunOutcome) -> Self {
        Self {
            run_id: context.run_id.clone(),
            base_url: context.base_url.clone(),
            started_at: context.started_at.to_rfc3339(),
            generated_at: chrono::Local::now().to_rfc3339(),
            halted_at: outcome.halted_at.clone(),
            steps: outcome.steps.clone(),
            summary: outcome.summary.clone(),
        }
    }

    /// Sum of the recorded step durations
    pub fn total_duration_ms(&self) -> u64 {
        self.steps.iter().filter_map(|s| s.duration_ms).sum()
    }
}
