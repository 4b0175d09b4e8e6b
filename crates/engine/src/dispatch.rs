//! Command dispatch – string tags in, guarded transitions out.
//!
//! [`execute_command`] is the fire-and-forget entry point: unknown tags and
//! guard failures leave the vehicle untouched and raise nothing.
//! [`Dispatcher`] runs the same path but reports what happened as a
//! [`CommandResult`].

use crate::command::{Command, CommandError};
use crate::controller::{Controller, Transition};
use crate::types::*;
use std::time::Instant;

/// Apply the command named by `tag` to `controller`, ignoring unknown tags
/// and rejected guards.
pub fn execute_command(tag: &str, controller: &mut Controller) {
    match tag.parse::<Command>() {
        Ok(cmd) => {
            controller.apply(cmd);
        }
        Err(e) => tracing::debug!(error = %e, "ignoring command"),
    }
}

// ---------------------------------------------------------------------------
// Reporting dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    case_insensitive: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept tags in any letter case (`left_door_open`).
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn resolve(&self, tag: &str) -> Result<Command, CommandError> {
        if self.case_insensitive {
            tag.to_ascii_uppercase().parse()
        } else {
            tag.parse()
        }
    }

    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Command::ALL.iter().map(|c| c.as_str()).collect();
        names.sort();
        names
    }

    /// Execute a command by tag and return a full CommandResult.
    ///
    /// Applied commands pass; rejected guards and unknown tags are skips
    /// because the vehicle is left as it was.
    pub fn execute(&self, tag: &str, controller: &mut Controller) -> CommandResult {
        let run_id = new_run_id();
        let start = Instant::now();

        let cmd = match self.resolve(tag) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring command");
                let mut r = result_skip(
                    "call",
                    tag.trim(),
                    &run_id,
                    elapsed_us(start),
                    ErrorCode::UnknownCommand,
                    e.to_string(),
                );
                r.data = snapshot_value(controller);
                return r;
            }
        };

        let mut r = match controller.apply(cmd) {
            Transition::Applied => result_ok("call", cmd.as_str(), &run_id, elapsed_us(start)),
            Transition::Rejected(reason) => result_skip(
                "call",
                cmd.as_str(),
                &run_id,
                elapsed_us(start),
                ErrorCode::GuardRejected,
                reason.to_string(),
            ),
        };
        r.data = snapshot_value(controller);
        r
    }
}

fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

fn snapshot_value(controller: &Controller) -> Option<serde_json::Value> {
    serde_json::to_value(controller.snapshot()).ok()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DoorStatus, LockStatus};

    fn run(ctrl: &mut Controller, tags: &[&str]) {
        for tag in tags {
            execute_command(tag, ctrl);
        }
    }

    #[test]
    fn test_sos_functionality() {
        let mut c = Controller::new();
        execute_command("SOS", &mut c);

        assert_eq!(c.speed(), 0);
        assert_eq!(c.left_door_status().as_str(), "OPEN");
        assert_eq!(c.right_door_status().as_str(), "OPEN");
        assert_eq!(c.left_door_lock().as_str(), "UNLOCKED");
        assert_eq!(c.right_door_lock().as_str(), "UNLOCKED");
        assert!(!c.trunk_status());
    }

    #[test]
    fn test_lock_door_functionality() {
        let mut c = Controller::new();
        execute_command("UNLOCK", &mut c);

        execute_command("LEFT_DOOR_LOCK", &mut c);
        assert_eq!(c.left_door_lock(), LockStatus::Locked);

        execute_command("RIGHT_DOOR_LOCK", &mut c);
        assert_eq!(c.right_door_lock(), LockStatus::Locked);
    }

    #[test]
    fn test_unlock_door_functionality() {
        let mut c = Controller::new();
        run(&mut c, &["UNLOCK", "LEFT_DOOR_UNLOCK"]);
        assert_eq!(c.left_door_lock(), LockStatus::Unlocked);

        execute_command("RIGHT_DOOR_UNLOCK", &mut c);
        assert_eq!(c.right_door_lock(), LockStatus::Unlocked);
    }

    #[test]
    fn test_auto_lock_doors_on_speed() {
        let mut c = Controller::new();
        run(
            &mut c,
            &[
                "UNLOCK",
                "LEFT_DOOR_UNLOCK",
                "RIGHT_DOOR_UNLOCK",
                "ENGINE_BTN",
                "ACCELERATE",
                "ACCELERATE",
                "ACCELERATE",
            ],
        );
        assert_eq!(c.speed(), 3);
        assert_eq!(c.left_door_lock(), LockStatus::Locked);
        assert_eq!(c.right_door_lock(), LockStatus::Locked);
    }

    #[test]
    fn test_unlock_doors_only_at_zero_speed() {
        let mut c = Controller::new();
        run(&mut c, &["UNLOCK", "LEFT_DOOR_UNLOCK", "RIGHT_DOOR_UNLOCK"]);
        assert_eq!(c.speed(), 0);
        assert_eq!(c.left_door_lock(), LockStatus::Unlocked);
        assert_eq!(c.right_door_lock(), LockStatus::Unlocked);

        run(
            &mut c,
            &[
                "LEFT_DOOR_LOCK",
                "RIGHT_DOOR_LOCK",
                "ENGINE_BTN",
                "ACCELERATE",
                "LEFT_DOOR_UNLOCK",
                "RIGHT_DOOR_UNLOCK",
            ],
        );
        assert_eq!(c.left_door_lock(), LockStatus::Locked);
        assert_eq!(c.right_door_lock(), LockStatus::Locked);
    }

    #[test]
    fn test_door_locks_frozen_while_vehicle_locked() {
        let mut c = Controller::new();
        run(
            &mut c,
            &[
                "UNLOCK",
                "LEFT_DOOR_LOCK",
                "RIGHT_DOOR_LOCK",
                "LOCK",
                "LEFT_DOOR_UNLOCK",
                "RIGHT_DOOR_UNLOCK",
            ],
        );
        assert_eq!(c.left_door_lock(), LockStatus::Locked);
        assert_eq!(c.right_door_lock(), LockStatus::Locked);
    }

    #[test]
    fn test_lock_doors_only_when_closed() {
        let mut c = Controller::new();
        run(
            &mut c,
            &[
                "UNLOCK",
                "LEFT_DOOR_CLOSE",
                "RIGHT_DOOR_CLOSE",
                "LEFT_DOOR_LOCK",
                "RIGHT_DOOR_LOCK",
            ],
        );
        assert_eq!(c.left_door_lock(), LockStatus::Locked);
        assert_eq!(c.right_door_lock(), LockStatus::Locked);

        run(
            &mut c,
            &[
                "LEFT_DOOR_UNLOCK",
                "RIGHT_DOOR_UNLOCK",
                "LEFT_DOOR_OPEN",
                "RIGHT_DOOR_OPEN",
                "LEFT_DOOR_LOCK",
                "RIGHT_DOOR_LOCK",
            ],
        );
        assert_eq!(c.left_door_status(), DoorStatus::Open);
        assert_eq!(c.left_door_lock(), LockStatus::Unlocked);
        assert_eq!(c.right_door_lock(), LockStatus::Unlocked);
    }

    #[test]
    fn test_trunk_open_and_close() {
        let mut c = Controller::new();
        run(&mut c, &["UNLOCK", "TRUNK_OPEN"]);
        assert!(!c.trunk_status());

        execute_command("TRUNK_CLOSE", &mut c);
        assert!(c.trunk_status());
    }

    #[test]
    fn test_trunk_repeated_commands_are_idempotent() {
        let mut c = Controller::new();
        run(&mut c, &["UNLOCK", "TRUNK_OPEN", "TRUNK_OPEN"]);
        assert!(!c.trunk_status());

        run(&mut c, &["TRUNK_CLOSE", "TRUNK_CLOSE"]);
        assert!(c.trunk_status());
    }

    #[test]
    fn test_trunk_stays_shut_while_moving() {
        let mut c = Controller::new();
        run(
            &mut c,
            &["UNLOCK", "ENGINE_BTN", "ACCELERATE", "ACCELERATE", "TRUNK_OPEN"],
        );
        assert!(c.trunk_status());
    }

    #[test]
    fn test_trunk_stays_shut_on_fresh_vehicle() {
        let mut c = Controller::new();
        execute_command("TRUNK_OPEN", &mut c);
        assert!(c.trunk_status());
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let mut c = Controller::new();
        let before = c.state().clone();
        execute_command("SELF_DESTRUCT", &mut c);
        execute_command("", &mut c);
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn test_dispatcher_reports_pass_and_snapshot() {
        let d = Dispatcher::new();
        let mut c = Controller::new();
        let r = d.execute("UNLOCK", &mut c);
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.target, "UNLOCK");
        assert!(r.error.is_none());
        assert_eq!(r.data.unwrap()["vehicle_locked"], false);
    }

    #[test]
    fn test_dispatcher_reports_guard_rejection() {
        let d = Dispatcher::new();
        let mut c = Controller::new();
        let r = d.execute("TRUNK_OPEN", &mut c);
        assert_eq!(r.status, Status::Skip);
        let err = r.error.unwrap();
        assert_eq!(err.code, ErrorCode::GuardRejected);
        assert_eq!(err.message, "vehicle is locked");
    }

    #[test]
    fn test_dispatcher_reports_unknown_command() {
        let d = Dispatcher::new();
        let mut c = Controller::new();
        let r = d.execute("HONK", &mut c);
        assert_eq!(r.status, Status::Skip);
        assert_eq!(r.error.unwrap().code, ErrorCode::UnknownCommand);
    }

    #[test]
    fn test_case_insensitive_dispatcher() {
        let mut c = Controller::new();
        let strict = Dispatcher::new();
        assert_eq!(strict.execute("unlock", &mut c).status, Status::Skip);
        assert!(c.is_vehicle_locked());

        let relaxed = Dispatcher::new().case_insensitive(true);
        assert_eq!(relaxed.execute("unlock", &mut c).status, Status::Pass);
        assert!(!c.is_vehicle_locked());
    }

    #[test]
    fn test_list_commands() {
        let names = Dispatcher::new().list();
        assert_eq!(names.len(), 16);
        assert!(names.contains(&"SOS"));
        assert!(names.contains(&"ENGINE_BTN"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }
}
