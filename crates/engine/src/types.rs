use serde::{Deserialize, Serialize};

use crate::state::{DoorStatus, LockStatus, VehicleSnapshot};

// ---------------------------------------------------------------------------
// Final result JSON – the stable output contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub run_id: String,
    pub command: String,
    pub target: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub timing: TimingInfo,
    /// Vehicle snapshot after the command, when a controller was involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    Skip,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Skip => "skip",
            Status::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    UnknownCommand,
    GuardRejected,
    ExpectationFailed,
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        f.write_str(&s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimingInfo {
    /// Microseconds; command application is far below a millisecond.
    pub total_us: u64,
}

// ---------------------------------------------------------------------------
// Scenario types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

/// One scenario step. Unknown or mixed keys fail to parse rather than
/// falling through to the other shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    Command(CommandStep),
    Expect(ExpectStep),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandStep {
    pub command: String,
    /// `pass` or `skip`; unchecked when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_status: Option<Status>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectStep {
    pub expect: ExpectedState,
}

/// Partial vehicle state; only the fields present are compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_door: Option<DoorStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_door: Option<DoorStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_door_lock: Option<LockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_door_lock: Option<LockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_locked: Option<bool>,
}

impl ExpectedState {
    /// Names of the fields whose expected value differs from `actual`.
    pub fn mismatches(&self, actual: &VehicleSnapshot) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.speed.is_some_and(|v| v != actual.speed) {
            out.push("speed");
        }
        if self.left_door.is_some_and(|v| v != actual.left_door) {
            out.push("left_door");
        }
        if self.right_door.is_some_and(|v| v != actual.right_door) {
            out.push("right_door");
        }
        if self.left_door_lock.is_some_and(|v| v != actual.left_door_lock) {
            out.push("left_door_lock");
        }
        if self.right_door_lock.is_some_and(|v| v != actual.right_door_lock) {
            out.push("right_door_lock");
        }
        if self.trunk_closed.is_some_and(|v| v != actual.trunk_closed) {
            out.push("trunk_closed");
        }
        if self.engine_on.is_some_and(|v| v != actual.engine_on) {
            out.push("engine_on");
        }
        if self.vehicle_locked.is_some_and(|v| v != actual.vehicle_locked) {
            out.push("vehicle_locked");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Scenario result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: Option<String>,
    pub overall_status: Status,
    pub step_results: Vec<CommandResult>,
    pub final_state: VehicleSnapshot,
}

// ---------------------------------------------------------------------------
// Serve / daemon protocol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a new run ID (UUIDv4).
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Build a successful CommandResult shell (caller fills in data).
pub fn result_ok(command: &str, target: &str, run_id: &str, total_us: u64) -> CommandResult {
    CommandResult {
        run_id: run_id.to_string(),
        command: command.to_string(),
        target: target.to_string(),
        status: Status::Pass,
        error: None,
        timing: TimingInfo { total_us },
        data: None,
    }
}

/// Build an error CommandResult.
pub fn result_err(
    command: &str,
    target: &str,
    run_id: &str,
    total_us: u64,
    code: ErrorCode,
    message: impl Into<String>,
) -> CommandResult {
    result_with_error(command, target, run_id, total_us, Status::Error, code, message)
}

/// Build a skip CommandResult – the command ran but had no effect.
pub fn result_skip(
    command: &str,
    target: &str,
    run_id: &str,
    total_us: u64,
    code: ErrorCode,
    reason: impl Into<String>,
) -> CommandResult {
    result_with_error(command, target, run_id, total_us, Status::Skip, code, reason)
}

fn result_with_error(
    command: &str,
    target: &str,
    run_id: &str,
    total_us: u64,
    status: Status,
    code: ErrorCode,
    message: impl Into<String>,
) -> CommandResult {
    CommandResult {
        run_id: run_id.to_string(),
        command: command.to_string(),
        target: target.to_string(),
        status,
        error: Some(ErrorInfo {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
        }),
        timing: TimingInfo { total_us },
        data: None,
    }
}
