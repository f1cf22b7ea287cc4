//! Terminal output for a deployment run

use colored::Colorize;
use shipflow_build::StepProgress;
use shipflow_core::{DeploymentError, PipelineObserver, Step};
use std::sync::Mutex;

/// Prints one header per step and the message each service returns.
///
/// Waiting for the database shows a spinner instead of a header; the build
/// streams its own output, so it gets a plain header.
#[derive(Default)]
pub struct TerminalObserver {
    spinner: Mutex<Option<StepProgress>>,
}

impl TerminalObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_spinner(&self) -> Option<StepProgress> {
        self.spinner.lock().ok().and_then(|mut slot| slot.take())
    }
}

fn header(step: Step) -> String {
    format!("[{}/{}] {}", step.number(), Step::ALL.len(), step.title())
}

impl PipelineObserver for TerminalObserver {
    fn step_started(&self, step: Step) {
        println!();
        if step == Step::ResolveDatabaseUrl {
            let spinner = StepProgress::new(&header(step));
            if let Ok(mut slot) = self.spinner.lock() {
                *slot = Some(spinner);
            }
        } else {
            println!("{}", header(step).blue().bold());
        }
    }

    fn step_succeeded(&self, step: Step, message: Option<&str>) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_success(&header(step));
        }
        if let Some(message) = message {
            println!("  {} {}", "✓".green(), message);
        }
    }

    fn step_failed(&self, step: Step, error: &DeploymentError) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_error(&error.to_string());
        }
        eprintln!("  {} {}", "✗".red(), step.title().red());
    }
}
