//! Scenario runner – execute scripted flows from YAML files.

use crate::controller::Controller;
use crate::dispatch::Dispatcher;
use crate::types::*;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to parse scenario YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario has no steps")]
    Empty,
}

/// Load a scenario from a YAML string.
pub fn load_scenario(yaml: &str) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = serde_yaml::from_str(yaml)?;
    if scenario.steps.is_empty() {
        return Err(ScenarioError::Empty);
    }
    Ok(scenario)
}

/// Execute a scenario against `controller` and return the overall result.
pub fn run_scenario(
    scenario: &Scenario,
    dispatcher: &Dispatcher,
    controller: &mut Controller,
) -> ScenarioResult {
    let mut step_results = Vec::new();
    let mut overall = Status::Pass;

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::Command(CommandStep {
                command,
                expect_status,
            }) => {
                let r = dispatcher.execute(command, controller);
                if let Some(expected) = expect_status {
                    if r.status != *expected {
                        tracing::warn!(
                            step = i,
                            command = %command,
                            expected = expected.as_str(),
                            actual = r.status.as_str(),
                            "scenario step status mismatch"
                        );
                        overall = Status::Fail;
                    }
                }
                r
            }
            ScenarioStep::Expect(ExpectStep { expect }) => {
                let r = check_expectation(expect, controller);
                if r.status != Status::Pass {
                    overall = Status::Fail;
                }
                r
            }
        };
        step_results.push(result);
    }

    ScenarioResult {
        name: scenario.name.clone(),
        overall_status: overall,
        step_results,
        final_state: controller.snapshot(),
    }
}

fn check_expectation(expect: &ExpectedState, controller: &Controller) -> CommandResult {
    let run_id = new_run_id();
    let start = Instant::now();
    let snapshot = controller.snapshot();
    let mismatched = expect.mismatches(&snapshot);
    let total_us = start.elapsed().as_micros() as u64;

    let mut r = if mismatched.is_empty() {
        result_ok("expect", "state", &run_id, total_us)
    } else {
        tracing::warn!(fields = ?mismatched, "scenario expectation failed");
        let mut r = result_err(
            "expect",
            "state",
            &run_id,
            total_us,
            ErrorCode::ExpectationFailed,
            format!("state mismatch: {}", mismatched.join(", ")),
        );
        r.status = Status::Fail;
        if let Some(err) = r.error.as_mut() {
            err.details = serde_json::json!({ "expected": expect, "fields": mismatched });
        }
        r
    };
    r.data = serde_json::to_value(&snapshot).ok();
    r
}
