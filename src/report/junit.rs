use super::types::TestResults;
use crate::runner::state::{StepStateReport, StepStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

const SUITE_NAME: &str = "blog-api-smoke";

fn seconds(ms: u64) -> String {
    (ms as f64 / 1000.0).to_string()
}

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.steps.len();
    let failures = results
        .steps
        .iter()
        .filter(|s| matches!(s.status, StepStatus::Failed { .. }))
        .count();
    let skipped = results
        .steps
        .iter()
        .filter(|s| matches!(s.status, StepStatus::Skipped { .. }))
        .count();
    let total_duration = seconds(results.total_duration_ms());

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", SUITE_NAME));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suites_start.push_attribute(("time", total_duration.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", SUITE_NAME));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("skipped", skipped.to_string().as_str()));
    suite_start.push_attribute(("id", results.run_id.as_str()));
    suite_start.push_attribute(("hostname", results.base_url.as_str()));
    suite_start.push_attribute(("time", total_duration.as_str()));
    suite_start.push_attribute(("timestamp", results.started_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for step in &results.steps {
        write_test_case(&mut writer, step)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, step: &StepStateReport) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    // Classname groups cases by resource, e.g. "api.blogs"
    let resource = step.endpoint.split('/').next().unwrap_or_default();
    let classname = format!("api.{}", resource);

    case_start.push_attribute(("name", step.name.as_str()));
    case_start.push_attribute(("classname", classname.as_str()));
    case_start.push_attribute(("time", seconds(step.duration_ms.unwrap_or(0)).as_str()));

    writer.write_event(Event::Start(case_start))?;

    match &step.status {
        StepStatus::Failed { error } => {
            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", error.as_str()));
            fail_start.push_attribute(("type", "AssertionError"));
            writer.write_event(Event::Start(fail_start))?;
            writer.write_event(Event::Text(BytesText::new(error)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        StepStatus::Skipped { reason } => {
            let mut skip = BytesStart::new("skipped");
            skip.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Empty(skip))?;
        }
        _ => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write(results: &TestResults, path: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    std::fs::write(path, xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::TestSummary;

    fn step(index: usize, name: &str, endpoint: &str, status: StepStatus) -> StepStateReport {
        StepStateReport {
            index,
            name: name.to_string(),
            method: "GET".to_string(),
            endpoint: endpoint.to_string(),
            status,
            status_code: None,
            duration_ms: Some(1500),
        }
    }

    #[test]
    fn test_generate_junit_xml() {
        let results = TestResults {
            run_id: "test-run".to_string(),
            base_url: "http://localhost:4000".to_string(),
            started_at: "2026-01-01T12:00:00+00:00".to_string(),
            generated_at: "2026-01-01T12:00:05+00:00".to_string(),
            halted_at: Some("User Registration".to_string()),
            steps: vec![
                step(0, "Health Check", "health", StepStatus::Passed),
                step(
                    1,
                    "User Registration",
                    "users/register",
                    StepStatus::Failed {
                        error: "Status: 400".to_string(),
                    },
                ),
                step(
                    2,
                    "User Login",
                    "users/login",
                    StepStatus::Skipped {
                        reason: "User Registration failed".to_string(),
                    },
                ),
            ],
            summary: TestSummary {
                total_tests: 2,
                passed_tests: 1,
                failed_tests: vec![],
                success_rate: 0.5,
            },
        };

        let xml = generate_junit_xml(&results).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="blog-api-smoke""#));
        assert!(xml.contains(r#"tests="3""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"skipped="1""#));
        assert!(xml.contains(r#"<testcase name="Health Check" classname="api.health""#));
        assert!(xml.contains(r#"classname="api.users""#));
        assert!(xml.contains(r#"message="Status: 400""#));
        assert!(xml.contains(r#"<skipped message="User Registration failed"/>"#));
    }
}
