use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use super::steps::Capture;

/// Step execution status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Passed,
    Failed { error: String },
    Skipped { reason: String },
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Passed | StepStatus::Failed { .. } | StepStatus::Skipped { .. }
        )
    }
}

/// State for a single step execution
#[derive(Debug, Clone)]
pub struct StepState {
    pub index: usize,
    pub name: String,
    pub method: String,
    pub endpoint: String,
    pub status: StepStatus,
    pub status_code: Option<u16>,
    pub started_at: Option<Instant>,
    pub duration_ms: Option<u64>,
}

impl StepState {
    pub fn new(index: usize, name: &str, method: &str, endpoint: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status: StepStatus::Pending,
            status_code: None,
            started_at: None,
            duration_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.status = StepStatus::Running;
        self.started_at = Some(Instant::now());
    }

    pub fn pass(&mut self) {
        self.finish(StepStatus::Passed);
    }

    pub fn fail(&mut self, error: String) {
        self.finish(StepStatus::Failed { error });
    }

    pub fn skip(&mut self, reason: String) {
        self.status = StepStatus::Skipped { reason };
    }

    fn finish(&mut self, status: StepStatus) {
        self.status = status;
        if let Some(start) = self.started_at {
            self.duration_ms = Some(start.elapsed().as_millis() as u64);
        }
    }

    /// Serialize state for reporting (without Instant which isn't serializable)
    pub fn to_report(&self) -> StepStateReport {
        StepStateReport {
            index: self.index,
            name: self.name.clone(),
            method: self.method.clone(),
            endpoint: self.endpoint.clone(),
            status: self.status.clone(),
            status_code: self.status_code,
            duration_ms: self.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepStateReport {
    pub index: usize,
    pub name: String,
    pub method: String,
    pub endpoint: String,
    pub status: StepStatus,
    pub status_code: Option<u16>,
    pub duration_ms: Option<u64>,
}

/// One failed step, in execution order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureRecord {
    pub name: String,
    pub error: String,
    pub response: Option<Value>,
}

/// Mutable state for one run: captured identifiers and pass/fail counters.
///
/// Every identifier starts out absent and is filled at most once, by the step
/// that creates the resource. Counters only move through [`record_pass`] and
/// [`record_failure`], which keeps `tests_run == tests_passed + failed_tests.len()`.
///
/// [`record_pass`]: SessionState::record_pass
/// [`record_failure`]: SessionState::record_failure
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    auth_token: Option<String>,
    user_id: Option<String>,
    category_id: Option<String>,
    blog_id: Option<String>,
    comment_id: Option<String>,
    tests_run: u32,
    tests_passed: u32,
    failed_tests: Vec<FailureRecord>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tests_run(&self) -> u32 {
        self.tests_run
    }

    pub fn tests_passed(&self) -> u32 {
        self.tests_passed
    }

    pub fn failed_tests(&self) -> &[FailureRecord] {
        &self.failed_tests
    }

    pub fn record_pass(&mut self) {
        self.tests_run += 1;
        self.tests_passed += 1;
    }

    pub fn record_failure(&mut self, name: &str, error: String, response: Option<Value>) {
        self.tests_run += 1;
        self.failed_tests.push(FailureRecord {
            name: name.to_string(),
            error,
            response,
        });
    }

    /// Current value of a captured identifier
    pub fn captured(&self, capture: Capture) -> Option<&str> {
        let slot = match capture {
            Capture::AuthToken => &self.auth_token,
            Capture::UserId => &self.user_id,
            Capture::CategoryId => &self.category_id,
            Capture::BlogId => &self.blog_id,
            Capture::CommentId => &self.comment_id,
        };
        slot.as_deref()
    }

    /// Store a captured identifier. Returns `false` and keeps the old value
    /// when the slot is already filled.
    pub fn capture(&mut self, capture: Capture, value: String) -> bool {
        let slot = match capture {
            Capture::AuthToken => &mut self.auth_token,
            Capture::UserId => &mut self.user_id,
            Capture::CategoryId => &mut self.category_id,
            Capture::BlogId => &mut self.blog_id,
            Capture::CommentId => &mut self.comment_id,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn summary(&self) -> TestSummary {
        let success_rate = if self.tests_run == 0 {
            0.0
        } else {
            f64::from(self.tests_passed) / f64::from(self.tests_run)
        };

        TestSummary {
            total_tests: self.tests_run,
            passed_tests: self.tests_passed,
            failed_tests: self.failed_tests.clone(),
            success_rate,
        }
    }
}

/// Result record of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub total_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: Vec<FailureRecord>,
    pub success_rate: f64,
}

impl TestSummary {
    /// Whether the run clears the exit threshold (strictly greater)
    pub fn passes(&self, threshold: f64) -> bool {
        self.success_rate > threshold
    }

    pub fn exit_code(&self, threshold: f64) -> u8 {
        if self.passes(threshold) {
            0
        } else {
            1
        }
    }
}
