use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;

use super::state::TestSummary;

/// Test execution events, delivered in order on the runner's thread
#[derive(Debug, Clone)]
pub enum TestEvent {
    SessionStarted {
        run_id: String,
        base_url: String,
    },
    SessionFinished {
        summary: TestSummary,
    },

    StepStarted {
        index: usize,
        name: String,
        method: String,
        endpoint: String,
    },
    StepPassed {
        index: usize,
        name: String,
        duration_ms: u64,
    },
    StepFailed {
        index: usize,
        name: String,
        error: String,
        duration_ms: u64,
    },

    /// A gating step failed and the rest of the suite will not run
    Halted {
        name: String,
        remaining: usize,
    },

    Log {
        message: String,
    },
}

pub trait EventListener {
    fn on_event(&mut self, event: &TestEvent);
}

/// Fans events out to every registered listener
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: TestEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener {
    spinner: Option<ProgressBar>,
    interactive: bool,
}

impl Default for ConsoleEventListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleEventListener {
    pub fn new() -> Self {
        Self {
            spinner: None,
            interactive: std::io::stdout().is_terminal(),
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn print_summary(summary: &TestSummary) {
        println!("\n{}", "=".repeat(50));
        println!("{} TEST RESULTS SUMMARY", "■".blue().bold());
        println!(
            "  {} Passed: {}/{}",
            "✓".green(),
            summary.passed_tests.to_string().green(),
            summary.total_tests
        );
        println!(
            "  {} Failed: {}/{}",
            "✗".red(),
            summary.failed_tests.len().to_string().red(),
            summary.total_tests
        );
        println!("  Success Rate: {:.1}%", summary.success_rate * 100.0);

        if !summary.failed_tests.is_empty() {
            println!("\n{} FAILED TESTS:", "✗".red().bold());
            for failure in &summary.failed_tests {
                println!("  • {}: {}", failure.name.white().bold(), failure.error);
            }
        }
    }
}

impl EventListener for ConsoleEventListener {
    fn on_event(&mut self, event: &TestEvent) {
        match event {
            TestEvent::SessionStarted { run_id, base_url } => {
                println!("{} Starting Blog API Test Suite", "▶".green().bold());
                println!("  Testing API at: {}", base_url.cyan());
                println!("  Run: {}", run_id.dimmed());
                println!("{}", "=".repeat(50));
            }

            TestEvent::StepStarted {
                index,
                name,
                method,
                endpoint,
            } => {
                // Without a TTY the spinner would only add escape codes to piped output
                let pb = if self.interactive {
                    ProgressBar::new_spinner()
                } else {
                    ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
                };
                if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
                    pb.set_style(style);
                }
                pb.set_message(format!(
                    "[{}] {} {}",
                    index + 1,
                    name,
                    format!("{} {}", method, endpoint).dimmed()
                ));
                pb.tick();
                self.spinner = Some(pb);
            }

            TestEvent::StepPassed {
                name, duration_ms, ..
            } => {
                self.clear_spinner();
                println!(
                    "  {} {}: {} ({}ms)",
                    "✓".green(),
                    name,
                    "PASSED".green().bold(),
                    duration_ms
                );
            }

            TestEvent::StepFailed {
                name,
                error,
                duration_ms,
                ..
            } => {
                self.clear_spinner();
                println!(
                    "  {} {}: {} - {} ({}ms)",
                    "✗".red(),
                    name,
                    "FAILED".red().bold(),
                    error,
                    duration_ms
                );
            }

            TestEvent::Halted { name, remaining } => {
                self.clear_spinner();
                println!(
                    "  {} {} failed - stopping tests ({} not run)",
                    "■".red().bold(),
                    name,
                    remaining.to_string().yellow()
                );
            }

            TestEvent::Log { message } => {
                match &self.spinner {
                    Some(pb) => pb.println(format!("      {}", message)),
                    None => println!("      {}", message),
                }
            }

            TestEvent::SessionFinished { summary } => {
                self.clear_spinner();
                Self::print_summary(summary);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Collect(Rc<RefCell<Vec<String>>>);

    impl EventListener for Collect {
        fn on_event(&mut self, event: &TestEvent) {
            let label = match event {
                TestEvent::StepStarted { name, .. } => format!("start {}", name),
                TestEvent::StepPassed { name, .. } => format!("pass {}", name),
                _ => "other".to_string(),
            };
            self.0.borrow_mut().push(label);
        }
    }

    #[test]
    fn test_emitter_reaches_every_listener_in_order() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();
        emitter.subscribe(Box::new(Collect(first.clone())));
        emitter.subscribe(Box::new(Collect(second.clone())));

        emitter.emit(TestEvent::StepStarted {
            index: 0,
            name: "Health Check".to_string(),
            method: "GET".to_string(),
            endpoint: "health".to_string(),
        });
        emitter.emit(TestEvent::StepPassed {
            index: 0,
            name: "Health Check".to_string(),
            duration_ms: 3,
        });

        let expected = vec!["start Health Check", "pass Health Check"];
        assert_eq!(*first.borrow(), expected);
        assert_eq!(*second.borrow(), expected);
    }
}
