use colored::Colorize;
use serde_json::Value;

use super::client::{ApiRequest, ApiResponse, ApiTransport, HttpMethod};
use super::context::TestContext;
use super::events::{EventEmitter, EventListener, TestEvent};
use super::state::{SessionState, StepState, StepStateReport, TestSummary};
use super::steps::{Capture, Step};

/// Outcome of a full run: per-step states plus the summary record
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub steps: Vec<StepStateReport>,
    pub summary: TestSummary,
    /// Gating step that stopped the run, if any
    pub halted_at: Option<String>,
}

/// Runs the fixed suite against one transport, one step at a time
pub struct TestRunner<T: ApiTransport> {
    transport: T,
    context: TestContext,
    session: SessionState,
    steps: Vec<StepState>,
    emitter: EventEmitter,
}

impl<T: ApiTransport> TestRunner<T> {
    pub fn new(transport: T, context: TestContext) -> Self {
        let session = SessionState::new();
        let steps = Step::ALL
            .iter()
            .enumerate()
            .map(|(i, step)| {
                StepState::new(
                    i,
                    step.name(),
                    step.method().as_str(),
                    &step.endpoint(&session),
                )
            })
            .collect();

        Self {
            transport,
            context,
            session,
            steps,
            emitter: EventEmitter::new(),
        }
    }

    /// Register a listener for test execution events
    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.emitter.subscribe(listener);
    }

    pub fn context(&self) -> &TestContext {
        &self.context
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Issue one request, attaching the session token only when asked to and
    /// when one has been captured
    pub fn make_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        auth_required: bool,
    ) -> ApiResponse {
        let token = if auth_required {
            self.session.captured(Capture::AuthToken)
        } else {
            None
        };

        self.transport.send(&ApiRequest {
            method,
            endpoint,
            body,
            token,
        })
    }

    /// Run every step in order, stopping early only when a gating step fails
    pub fn run_all(&mut self) -> RunOutcome {
        self.emitter.emit(TestEvent::SessionStarted {
            run_id: self.context.run_id.clone(),
            base_url: self.context.base_url.clone(),
        });

        let mut halted_at = None;
        for (index, step) in Step::ALL.into_iter().enumerate() {
            if !self.run_step(index, step) && step.is_gating() {
                halted_at = Some(step.name().to_string());
                self.halt(index, step);
                break;
            }
        }

        let summary = self.session.summary();
        self.emitter.emit(TestEvent::SessionFinished {
            summary: summary.clone(),
        });

        RunOutcome {
            steps: self.steps.iter().map(StepState::to_report).collect(),
            summary,
            halted_at,
        }
    }

    /// Execute one step and record its result. Returns whether it passed.
    pub fn run_step(&mut self, index: usize, step: Step) -> bool {
        let endpoint = step.endpoint(&self.session);
        self.steps[index].endpoint = endpoint.clone();
        self.steps[index].start();

        self.emitter.emit(TestEvent::StepStarted {
            index,
            name: step.name().to_string(),
            method: step.method().to_string(),
            endpoint: endpoint.clone(),
        });

        if let Some(prerequisite) = step.prerequisite() {
            if !prerequisite.is_met(&self.session) {
                self.record_failure(index, step, prerequisite.missing_message().to_string(), None);
                return false;
            }
        }

        let payload = step.payload(&self.context, &self.session);
        let response = self.make_request(
            step.method(),
            &endpoint,
            payload.as_ref(),
            step.auth_required(),
        );
        self.steps[index].status_code = response.status;

        if !response.is_success(step.expected_status()) {
            let error = response.describe_failure();
            self.record_failure(index, step, error, Some(response.body));
            return false;
        }

        if let Some(capture) = step.capture() {
            match capture.extract(&response.body) {
                Some(value) => {
                    log::info!("{}: captured {} {}", step.name(), capture.label(), value);
                    self.emitter.emit(TestEvent::Log {
                        message: format!("{} {}: {}", "↳".blue(), capture.label(), value.cyan()),
                    });
                    if !self.session.capture(capture, value) {
                        log::warn!("{} already captured, keeping the first value", capture.label());
                    }
                }
                None => {
                    log::warn!(
                        "{} succeeded but the response has no {} (tried {})",
                        step.name(),
                        capture.label(),
                        capture.candidates().join(", ")
                    );
                    log::debug!("{} response: {}", step.name(), response.body);
                }
            }
        }

        self.record_pass(index, step);
        true
    }

    fn record_pass(&mut self, index: usize, step: Step) {
        self.session.record_pass();
        let state = &mut self.steps[index];
        state.pass();
        self.emitter.emit(TestEvent::StepPassed {
            index,
            name: step.name().to_string(),
            duration_ms: state.duration_ms.unwrap_or(0),
        });
    }

    fn record_failure(&mut self, index: usize, step: Step, error: String, response: Option<Value>) {
        self.session
            .record_failure(step.name(), error.clone(), response);
        let state = &mut self.steps[index];
        state.fail(error.clone());
        self.emitter.emit(TestEvent::StepFailed {
            index,
            name: step.name().to_string(),
            error,
            duration_ms: state.duration_ms.unwrap_or(0),
        });
    }

    /// Mark everything after `index` as skipped; skipped steps never count as run
    fn halt(&mut self, index: usize, step: Step) {
        let reason = format!("{} failed", step.name());
        let remaining = &mut self.steps[index + 1..];
        for state in remaining.iter_mut() {
            state.skip(reason.clone());
        }
        let count = remaining.len();
        self.emitter.emit(TestEvent::Halted {
            name: step.name().to_string(),
            remaining: count,
        });
    }
}
