pub mod json;
pub mod junit;
pub mod types;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub use types::TestResults;

pub const JSON_REPORT: &str = "test-results.json";
pub const JUNIT_REPORT: &str = "junit.xml";

/// Write the JSON and JUnit reports into `output_dir`, creating it if needed
pub fn write_reports(results: &TestResults, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let json_path = output_dir.join(JSON_REPORT);
    json::write(results, &json_path)?;
    println!(
        "\n{} JSON report saved to: {}",
        "📄".to_string().blue(),
        json_path.display().to_string().cyan()
    );

    let junit_path = output_dir.join(JUNIT_REPORT);
    junit::write(results, &junit_path)?;
    println!(
        "{} JUnit report saved to: {}",
        "📊".to_string().blue(),
        junit_path.display().to_string().cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{FailureRecord, StepStateReport, StepStatus, TestSummary};
    use serde_json::json;

    fn sample() -> TestResults {
        TestResults {
            run_id: "run-1".to_string(),
            base_url: "http://localhost:4000".to_string(),
            started_at: "2026-01-01T12:00:00+00:00".to_string(),
            generated_at: "2026-01-01T12:00:01+00:00".to_string(),
            halted_at: Some("Health Check".to_string()),
            steps: vec![StepStateReport {
                index: 0,
                name: "Health Check".to_string(),
                method: "GET".to_string(),
                endpoint: "health".to_string(),
                status: StepStatus::Failed {
                    error: "Status: 503".to_string(),
                },
                status_code: Some(503),
                duration_ms: Some(12),
            }],
            summary: TestSummary {
                total_tests: 1,
                passed_tests: 0,
                failed_tests: vec![FailureRecord {
                    name: "Health Check".to_string(),
                    error: "Status: 503".to_string(),
                    response: Some(json!({"success": false})),
                }],
                success_rate: 0.0,
            },
        }
    }

    #[test]
    fn test_write_reports_creates_both_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("nested/reports");

        write_reports(&sample(), &output).expect("reports written");

        assert!(output.join(JUNIT_REPORT).exists());
        let loaded = json::read(&output.join(JSON_REPORT)).expect("json report");
        assert_eq!(loaded.run_id, "run-1");
        assert_eq!(loaded.summary, sample().summary);
        assert_eq!(loaded.steps[0].status_code, Some(503));
    }

    #[test]
    fn test_json_uses_camel_case_summary() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(value["summary"]["totalTests"], 1);
        assert_eq!(value["summary"]["passedTests"], 0);
        assert_eq!(value["summary"]["successRate"], 0.0);
        assert_eq!(value["summary"]["failedTests"][0]["name"], "Health Check");
        assert_eq!(value["steps"][0]["status"]["type"], "failed");
        assert_eq!(value["haltedAt"], "Health Check");
    }
}
